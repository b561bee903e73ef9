use std::collections::HashSet;
use tracing::{info, warn};

use crate::analyzers::csat::{CsatSplit, split_csat};
use crate::analyzers::period::{
    DatedScore, combine_quarterly, combine_yearly, period_scores, quarterly, yearly,
};
use crate::analyzers::survey::{aggregate_by_cohort, aggregate_by_survey, aggregate_whole_dataset};
use crate::analyzers::trend::{available_years, gauge_for_year, trend_series};
use crate::analyzers::types::{AnalysisReport, TrendDataset, TrendSeries};
use crate::config::AnalysisConfig;
use crate::normalize::{Response, Source, SourceFrame, Warning, normalize_form, normalize_hubspot};
use crate::parser::RawTable;

/// Both sources after normalization, plus warnings raised so far.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub hubspot: Option<SourceFrame>,
    pub form: Option<SourceFrame>,
    pub warnings: Vec<Warning>,
}

impl Prepared {
    /// Normalizes whichever sources were loaded.
    pub fn new(hubspot: Option<&RawTable>, form: Option<&RawTable>, config: &AnalysisConfig) -> Self {
        let mut warnings = Vec::new();

        let hubspot = match hubspot {
            Some(table) => Some(normalize_hubspot(table, config)),
            None => {
                warnings.push(Warning::missing_source(Source::HubSpot));
                None
            }
        };
        let form = match form {
            Some(table) => Some(normalize_form(table, config)),
            None => {
                warnings.push(Warning::missing_source(Source::GoogleForm));
                None
            }
        };

        Self {
            hubspot,
            form,
            warnings,
        }
    }

    fn frame(&self, source: Source) -> Option<&SourceFrame> {
        match source {
            Source::HubSpot => self.hubspot.as_ref(),
            Source::GoogleForm => self.form.as_ref(),
        }
    }

    /// Cleaned score/date pairs for a trend dataset.
    ///
    /// No year floor, score range or CSAT exclusion applies here.
    pub fn dataset(&self, dataset: TrendDataset) -> Vec<DatedScore> {
        let sources: &[Source] = match dataset {
            TrendDataset::Combined => &[Source::HubSpot, Source::GoogleForm],
            TrendDataset::HubSpotOnly => &[Source::HubSpot],
            TrendDataset::FormsOnly => &[Source::GoogleForm],
        };

        sources
            .iter()
            .filter_map(|s| self.frame(*s))
            .flat_map(|f| f.responses.iter().filter_map(Response::dated_score))
            .collect()
    }
}

/// Builds every table and series from the two raw exports.
///
/// Never fails: a missing source or column leaves the dependent tables empty
/// and adds a [`Warning`] to the report.
pub fn analyze(
    hubspot: Option<&RawTable>,
    form: Option<&RawTable>,
    config: &AnalysisConfig,
) -> AnalysisReport {
    analyze_prepared(Prepared::new(hubspot, form, config), config)
}

pub fn analyze_prepared(prepared: Prepared, config: &AnalysisConfig) -> AnalysisReport {
    let mut report = AnalysisReport {
        warnings: prepared.warnings.clone(),
        ..Default::default()
    };

    let mut csat_names = HashSet::new();

    if let Some(frame) = &prepared.hubspot {
        let cols = &config.hubspot;
        if !frame.columns.score {
            report
                .warnings
                .push(Warning::missing_column(Source::HubSpot, &cols.score, "any HubSpot table"));
        } else {
            if frame.columns.group {
                let surveys = aggregate_by_survey(&frame.responses);
                let split = split_csat(surveys.clone(), &frame.responses, config.csat_scale_max);
                csat_names = split.csat_survey_names();

                let CsatSplit { nps, csat } = split;
                report.hubspot_surveys = surveys;
                report.hubspot_nps_surveys = nps;
                report.hubspot_csat_surveys = csat;
            } else {
                report.warnings.push(Warning::missing_column(
                    Source::HubSpot,
                    &cols.survey_name,
                    "survey or CSAT tables",
                ));
            }

            if frame.columns.date {
                let rows = period_scores(&frame.responses, &csat_names, config);
                report.hubspot_yearly = yearly(&rows);
                report.hubspot_quarterly = quarterly(&rows);
            } else {
                report.warnings.push(Warning::missing_column(
                    Source::HubSpot,
                    &cols.date,
                    "yearly breakdown",
                ));
            }
        }
    }

    if let Some(frame) = &prepared.form {
        let cols = &config.form;
        if !frame.columns.score {
            report
                .warnings
                .push(Warning::missing_column(Source::GoogleForm, &cols.score, "any Google Form table"));
        } else {
            if frame.columns.group {
                report.form_cohorts = aggregate_by_cohort(&frame.responses);
            } else {
                report.warnings.push(Warning::missing_column(
                    Source::GoogleForm,
                    &cols.cohort,
                    "cohort table",
                ));
            }
            report.form_overall = Some(aggregate_whole_dataset(&frame.responses, frame.columns.date));

            if frame.columns.date {
                let rows = period_scores(&frame.responses, &HashSet::new(), config);
                report.form_yearly = yearly(&rows);
                report.form_quarterly = quarterly(&rows);
            } else {
                report.warnings.push(Warning::missing_column(
                    Source::GoogleForm,
                    &cols.date,
                    "yearly breakdown",
                ));
            }
        }
    }

    report.combined_yearly = combine_yearly(&[
        report.hubspot_yearly.as_slice(),
        report.form_yearly.as_slice(),
    ]);
    report.combined_quarterly = combine_quarterly(&[
        report.hubspot_quarterly.as_slice(),
        report.form_quarterly.as_slice(),
    ]);

    report.trends = TrendDataset::ALL
        .iter()
        .map(|&ds| TrendSeries {
            dataset: ds.to_string(),
            points: trend_series(&prepared.dataset(ds)),
        })
        .collect();

    let combined = prepared.dataset(TrendDataset::Combined);
    report.available_years = available_years(&combined);
    report.latest_gauge = report
        .available_years
        .first()
        .and_then(|&year| gauge_for_year(&combined, year));

    if report.combined_yearly.is_empty() {
        warn!("No responses survived the period filters");
    }
    info!(
        surveys = report.hubspot_surveys.len(),
        csat_surveys = report.hubspot_csat_surveys.len(),
        cohorts = report.form_cohorts.len(),
        years = report.combined_yearly.len(),
        warnings = report.warnings.len(),
        "Analysis complete"
    );

    report
}
