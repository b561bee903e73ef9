//! Yearly and quarterly NPS buckets, per source and combined.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};

use crate::analyzers::tier::TierCounts;
use crate::analyzers::types::{QuarterKey, QuarterlyAggregate, YearlyAggregate};
use crate::analyzers::utility::truncated_net_pct;
use crate::config::AnalysisConfig;
use crate::normalize::Response;

/// A response reduced to what period bucketing needs.
pub type DatedScore = (NaiveDate, f64);

pub fn quarter_of(date: NaiveDate) -> QuarterKey {
    QuarterKey {
        year: date.year(),
        quarter: date.month0() / 3 + 1,
    }
}

/// Rows eligible for the period tables.
///
/// Keeps rows with a score and a date, a year at or after `min_year`, and a
/// score inside the configured range. Rows from any survey in
/// `excluded_surveys` are dropped first.
pub fn period_scores(
    responses: &[Response],
    excluded_surveys: &HashSet<String>,
    config: &AnalysisConfig,
) -> Vec<DatedScore> {
    responses
        .iter()
        .filter(|r| match &r.survey_name {
            Some(name) => !excluded_surveys.contains(name),
            None => true,
        })
        .filter_map(Response::dated_score)
        .filter(|(date, _)| date.year() >= config.min_year)
        .filter(|(_, score)| config.score_in_range(*score))
        .collect()
}

/// Responses, tier counts and truncated NPS for one bucket.
fn bucket(scores: &[f64]) -> (usize, TierCounts, Option<i64>) {
    let counts = TierCounts::from_period_scores(scores);
    let nps = truncated_net_pct(counts.promoters, counts.detractors, scores.len());
    (scores.len(), counts, nps)
}

fn group_by<K: Ord>(rows: &[DatedScore], key: impl Fn(NaiveDate) -> K) -> BTreeMap<K, Vec<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for &(date, score) in rows {
        groups.entry(key(date)).or_default().push(score);
    }
    groups
}

/// One row per calendar year, oldest first.
pub fn yearly(rows: &[DatedScore]) -> Vec<YearlyAggregate> {
    group_by(rows, |d| d.year())
        .into_iter()
        .map(|(year, scores)| {
            let (responses, counts, nps) = bucket(&scores);
            YearlyAggregate {
                year,
                responses,
                promoters: counts.promoters,
                passives: counts.passives,
                detractors: counts.detractors,
                nps,
            }
        })
        .collect()
}

/// One row per calendar quarter, oldest first, labelled `"{year}-Q{n}"`.
pub fn quarterly(rows: &[DatedScore]) -> Vec<QuarterlyAggregate> {
    group_by(rows, quarter_of)
        .into_iter()
        .map(|(key, scores)| {
            let (responses, counts, nps) = bucket(&scores);
            QuarterlyAggregate {
                key,
                label: key.to_string(),
                responses,
                promoters: counts.promoters,
                passives: counts.passives,
                detractors: counts.detractors,
                nps,
            }
        })
        .collect()
}

#[derive(Default)]
struct Totals {
    responses: usize,
    counts: TierCounts,
}

impl Totals {
    fn add(&mut self, responses: usize, promoters: usize, passives: usize, detractors: usize) {
        self.responses += responses;
        self.counts.merge(&TierCounts {
            promoters,
            passives,
            detractors,
        });
    }

    fn nps(&self) -> Option<i64> {
        truncated_net_pct(self.counts.promoters, self.counts.detractors, self.responses)
    }
}

/// Merges per-source yearly tables by summing counts per year, then
/// recomputes NPS from the sums.
pub fn combine_yearly(sources: &[&[YearlyAggregate]]) -> Vec<YearlyAggregate> {
    let mut totals: BTreeMap<i32, Totals> = BTreeMap::new();
    for row in sources.iter().flat_map(|s| s.iter()) {
        totals
            .entry(row.year)
            .or_default()
            .add(row.responses, row.promoters, row.passives, row.detractors);
    }

    totals
        .into_iter()
        .map(|(year, t)| YearlyAggregate {
            year,
            responses: t.responses,
            promoters: t.counts.promoters,
            passives: t.counts.passives,
            detractors: t.counts.detractors,
            nps: t.nps(),
        })
        .collect()
}

/// Quarterly counterpart of [`combine_yearly`].
pub fn combine_quarterly(sources: &[&[QuarterlyAggregate]]) -> Vec<QuarterlyAggregate> {
    let mut totals: BTreeMap<QuarterKey, Totals> = BTreeMap::new();
    for row in sources.iter().flat_map(|s| s.iter()) {
        totals
            .entry(row.key)
            .or_default()
            .add(row.responses, row.promoters, row.passives, row.detractors);
    }

    totals
        .into_iter()
        .map(|(key, t)| QuarterlyAggregate {
            key,
            label: key.to_string(),
            responses: t.responses,
            promoters: t.counts.promoters,
            passives: t.counts.passives,
            detractors: t.counts.detractors,
            nps: t.nps(),
        })
        .collect()
}
