//! Per-survey descriptive statistics and NPS.

use std::collections::BTreeMap;

use crate::analyzers::tier::TierCounts;
use crate::analyzers::types::SurveyAggregate;
use crate::analyzers::utility::{self, truncated_net_pct};
use crate::normalize::Response;

/// Aggregates one group of responses.
///
/// `responses` counts every row in the group; NPS and the descriptive
/// statistics use only rows with a score. A group with no scores gets `None`
/// for NPS, min, max, mean, median and mode.
pub fn aggregate_group(key: Option<String>, rows: &[&Response]) -> SurveyAggregate {
    let scores: Vec<f64> = rows.iter().filter_map(|r| r.score).collect();
    let counts = TierCounts::from_survey_scores(&scores);

    SurveyAggregate {
        survey_name: key,
        responses: rows.len(),
        first_appearance: rows.iter().filter_map(|r| r.date).min(),
        last_appearance: rows.iter().filter_map(|r| r.date).max(),
        min_score: utility::min(&scores).map(|v| v.trunc() as i64),
        max_score: utility::max(&scores).map(|v| v.trunc() as i64),
        mean: utility::mean(&scores).map(utility::round2),
        mode: utility::mode(&scores).map(|v| v.trunc() as i64),
        median: utility::median(&scores).map(|v| v.trunc() as i64),
        promoters: counts.promoters,
        passives: counts.passives,
        detractors: counts.detractors,
        nps: truncated_net_pct(counts.promoters, counts.detractors, scores.len()),
    }
}

/// Groups by `key`, sorted by key. Rows without a key are left out.
fn aggregate_keyed<F>(responses: &[Response], key: F) -> Vec<SurveyAggregate>
where
    F: Fn(&Response) -> Option<&str>,
{
    let mut groups: BTreeMap<&str, Vec<&Response>> = BTreeMap::new();
    for r in responses {
        if let Some(k) = key(r) {
            groups.entry(k).or_default().push(r);
        }
    }

    groups
        .into_iter()
        .map(|(k, rows)| aggregate_group(Some(k.to_string()), &rows))
        .collect()
}

/// One row per distinct survey name.
pub fn aggregate_by_survey(responses: &[Response]) -> Vec<SurveyAggregate> {
    aggregate_keyed(responses, |r| r.survey_name.as_deref())
}

/// One row per cohort, for the form export that carries no survey name.
///
/// Cohorts are not surveys, so these rows mix several survey rounds; see
/// [`aggregate_whole_dataset`] for the single summary row.
pub fn aggregate_by_cohort(responses: &[Response]) -> Vec<SurveyAggregate> {
    aggregate_keyed(responses, |r| r.cohort.as_deref())
}

/// A single summary row over every scored response.
///
/// Unscored rows are dropped first, so `responses` equals the scored count.
/// First/last appearance are only filled when the export had a date column.
pub fn aggregate_whole_dataset(responses: &[Response], has_date_column: bool) -> SurveyAggregate {
    let scored: Vec<&Response> = responses.iter().filter(|r| r.score.is_some()).collect();
    let mut summary = aggregate_group(None, &scored);

    if !has_date_column {
        summary.first_appearance = None;
        summary.last_appearance = None;
    }
    summary
}
