//! Promoter / passive / detractor classification.
//!
//! Two boundary conventions are in use. The per-survey tables use half-open
//! bounds (`< 9`, `< 7`); the period tables and trend views use closed bounds
//! (`<= 8`, `<= 6`). They agree on whole-number scores and differ on
//! fractional ones, so each table keeps its own.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Promoter,
    Passive,
    Detractor,
}

/// Per-survey convention: promoter `>= 9`, passive `7 <= s < 9`, detractor `< 7`.
pub fn survey_tier(score: f64) -> Tier {
    if score >= 9.0 {
        Tier::Promoter
    } else if score >= 7.0 {
        Tier::Passive
    } else {
        Tier::Detractor
    }
}

/// Period convention: promoter `>= 9`, passive `7 <= s <= 8`, detractor `<= 6`.
///
/// Scores strictly between 6 and 7 or 8 and 9 fall in no tier.
pub fn period_tier(score: f64) -> Option<Tier> {
    if score >= 9.0 {
        Some(Tier::Promoter)
    } else if (7.0..=8.0).contains(&score) {
        Some(Tier::Passive)
    } else if score <= 6.0 {
        Some(Tier::Detractor)
    } else {
        None
    }
}

/// Promoter, passive and detractor counts for one group of scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
}

impl TierCounts {
    pub fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Promoter => self.promoters += 1,
            Tier::Passive => self.passives += 1,
            Tier::Detractor => self.detractors += 1,
        }
    }

    pub fn from_survey_scores(scores: &[f64]) -> Self {
        let mut counts = Self::default();
        for &s in scores {
            counts.add(survey_tier(s));
        }
        counts
    }

    pub fn from_period_scores(scores: &[f64]) -> Self {
        let mut counts = Self::default();
        for tier in scores.iter().filter_map(|&s| period_tier(s)) {
            counts.add(tier);
        }
        counts
    }

    pub fn merge(&mut self, other: &TierCounts) {
        self.promoters += other.promoters;
        self.passives += other.passives;
        self.detractors += other.detractors;
    }

    pub fn total(&self) -> usize {
        self.promoters + self.passives + self.detractors
    }
}
