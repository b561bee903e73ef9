//! Splits 0-2 scale surveys out of the NPS table and scores them as CSAT.

use std::collections::HashSet;
use tracing::debug;

use crate::analyzers::types::{CsatAggregate, SurveyAggregate};
use crate::analyzers::utility::rounded_pct;
use crate::normalize::Response;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsatSplit {
    pub nps: Vec<SurveyAggregate>,
    pub csat: Vec<CsatAggregate>,
}

impl CsatSplit {
    /// Names of the surveys reclassified as CSAT.
    pub fn csat_survey_names(&self) -> HashSet<String> {
        self.csat.iter().map(|c| c.survey_name.clone()).collect()
    }
}

/// True when the survey's highest observed score equals `scale_max`.
pub fn is_csat(aggregate: &SurveyAggregate, scale_max: f64) -> bool {
    aggregate.max_score.map(|m| m as f64) == Some(scale_max)
}

/// Moves surveys whose max score equals `scale_max` into a CSAT table.
///
/// Positives are the survey's rows scoring exactly `scale_max`; the CSAT
/// score is positives over the survey's response count, as a percentage
/// rounded half to even.
pub fn split_csat(
    surveys: Vec<SurveyAggregate>,
    responses: &[Response],
    scale_max: f64,
) -> CsatSplit {
    let mut split = CsatSplit::default();

    for survey in surveys {
        let Some(name) = survey.survey_name.clone() else {
            split.nps.push(survey);
            continue;
        };
        if !is_csat(&survey, scale_max) {
            split.nps.push(survey);
            continue;
        }

        let positives = responses
            .iter()
            .filter(|r| r.survey_name.as_deref() == Some(name.as_str()))
            .filter(|r| r.score == Some(scale_max))
            .count();
        let csat = rounded_pct(positives, survey.responses);
        debug!(survey = %name, positives, ?csat, "Survey reclassified as CSAT");

        split.csat.push(CsatAggregate {
            survey_name: name,
            responses: survey.responses,
            first_appearance: survey.first_appearance,
            last_appearance: survey.last_appearance,
            min_score: survey.min_score,
            max_score: survey.max_score,
            mean: survey.mean,
            mode: survey.mode,
            median: survey.median,
            positives,
            csat_score: csat.map(|c| format!("{c}%")).unwrap_or_default(),
            csat,
        });
    }

    split
}
