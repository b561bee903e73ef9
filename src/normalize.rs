//! Coerces the two survey exports into one response shape.
//!
//! The CRM export groups answers by survey; the form export only records the
//! respondent's cohort. Both end up as [`Response`] rows with an optional
//! score and an optional date. Coercion never fails: bad cells become `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::parser::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Source {
    HubSpot,
    GoogleForm,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::HubSpot => write!(f, "HubSpot"),
            Source::GoogleForm => write!(f, "Google Form"),
        }
    }
}

/// One survey answer after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub score: Option<f64>,
    pub date: Option<NaiveDate>,
    pub survey_name: Option<String>,
    pub cohort: Option<String>,
    pub source: Source,
}

impl Response {
    /// Score and date together, when both coerced.
    pub fn dated_score(&self) -> Option<(NaiveDate, f64)> {
        Some((self.date?, self.score?))
    }
}

/// Which expected columns a source actually carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub score: bool,
    pub date: bool,
    pub group: bool,
}

/// A user-visible notice that some table could not be produced in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub source: Option<Source>,
    pub message: String,
}

impl Warning {
    pub fn missing_column(source: Source, column: &str, skipped: &str) -> Self {
        let warning = Warning {
            source: Some(source),
            message: format!("Missing '{column}' column in {source} data; cannot calculate {skipped}."),
        };
        warn!(source = %source, column, skipped, "Expected column missing");
        warning
    }

    pub fn missing_source(source: Source) -> Self {
        warn!(source = %source, "Source not loaded");
        Warning {
            source: Some(source),
            message: format!("No {source} data loaded; its tables are empty."),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The normalized rows of one source plus the columns it was built from.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    pub source: Source,
    pub responses: Vec<Response>,
    pub columns: ColumnPresence,
}

impl SourceFrame {
    /// Rows with both a score and a date, the input to period bucketing.
    pub fn cleaned(&self) -> Vec<Response> {
        clean(&self.responses)
    }
}

/// Drops rows whose score or date failed to coerce.
pub fn clean(responses: &[Response]) -> Vec<Response> {
    responses
        .iter()
        .filter(|r| r.dated_score().is_some())
        .cloned()
        .collect()
}

/// Parses a score cell. Blank, non-numeric and non-finite values are missing.
pub fn coerce_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a date cell to date-only granularity; time of day is discarded.
pub fn coerce_date(raw: &str, config: &AnalysisConfig) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    for format in &config.datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }

    config
        .date_formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn text_cell(table: &RawTable, row: usize, col: Option<usize>) -> Option<String> {
    let value = table.cell(row, col?)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn build_frame(
    table: &RawTable,
    source: Source,
    score_col: &str,
    date_col: &str,
    group_col: &str,
    config: &AnalysisConfig,
) -> SourceFrame {
    let score_idx = table.column_index(score_col);
    let date_idx = table.column_index(date_col);
    let group_idx = table.column_index(group_col);

    let columns = ColumnPresence {
        score: score_idx.is_some(),
        date: date_idx.is_some(),
        group: group_idx.is_some(),
    };

    let mut responses = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let score = score_idx
            .and_then(|c| table.cell(row, c))
            .and_then(coerce_score);
        let date = date_idx
            .and_then(|c| table.cell(row, c))
            .and_then(|v| coerce_date(v, config));
        let group = text_cell(table, row, group_idx);

        let (survey_name, cohort) = match source {
            Source::HubSpot => (group, None),
            Source::GoogleForm => (None, group),
        };

        responses.push(Response {
            score,
            date,
            survey_name,
            cohort,
            source,
        });
    }

    let scored = responses.iter().filter(|r| r.score.is_some()).count();
    let dated = responses.iter().filter(|r| r.date.is_some()).count();
    debug!(
        source = %source,
        rows = responses.len(),
        scored,
        dated,
        ?columns,
        "Source normalized"
    );

    SourceFrame {
        source,
        responses,
        columns,
    }
}

/// Normalizes the CRM export (`Survey Name`, `Rating`, `Date` by default).
pub fn normalize_hubspot(table: &RawTable, config: &AnalysisConfig) -> SourceFrame {
    let cols = &config.hubspot;
    build_frame(
        table,
        Source::HubSpot,
        &cols.score,
        &cols.date,
        &cols.survey_name,
        config,
    )
}

/// Normalizes the form export; its grouping column is the respondent's cohort.
pub fn normalize_form(table: &RawTable, config: &AnalysisConfig) -> SourceFrame {
    let cols = &config.form;
    build_frame(
        table,
        Source::GoogleForm,
        &cols.score,
        &cols.date,
        &cols.cohort,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_coerce_score() {
        assert_eq!(coerce_score("9"), Some(9.0));
        assert_eq!(coerce_score(" 7.5 "), Some(7.5));
        assert_eq!(coerce_score(""), None);
        assert_eq!(coerce_score("ten"), None);
        assert_eq!(coerce_score("NaN"), None);
        assert_eq!(coerce_score("inf"), None);
    }

    #[test]
    fn test_coerce_date_drops_time_of_day() {
        let config = AnalysisConfig::default();
        assert_eq!(coerce_date("2022-05-15 23:59:10", &config), Some(ymd(2022, 5, 15)));
        assert_eq!(coerce_date("2022-05-15T08:00:00Z", &config), Some(ymd(2022, 5, 15)));
        assert_eq!(coerce_date("2022-05-15", &config), Some(ymd(2022, 5, 15)));
        assert_eq!(coerce_date("15/05/2022 10:31:02", &config), Some(ymd(2022, 5, 15)));
        assert_eq!(coerce_date("31/12/2022", &config), Some(ymd(2022, 12, 31)));
    }

    #[test]
    fn test_coerce_slash_dates_month_first() {
        let config = AnalysisConfig::default();
        assert_eq!(coerce_date("12/31/2022", &config), Some(ymd(2022, 12, 31)));
        assert_eq!(coerce_date("03/04/2022", &config), Some(ymd(2022, 3, 4)));
        assert_eq!(coerce_date("03/04/2022 09:15:00", &config), Some(ymd(2022, 3, 4)));
    }

    #[test]
    fn test_coerce_slash_dates_day_first_when_configured() {
        let config = AnalysisConfig::from_json(
            r#"{"date_formats": ["%d/%m/%Y", "%m/%d/%Y"], "datetime_formats": []}"#,
        )
        .unwrap();
        assert_eq!(coerce_date("03/04/2022", &config), Some(ymd(2022, 4, 3)));
        assert_eq!(coerce_date("12/31/2022", &config), Some(ymd(2022, 12, 31)));
    }

    #[test]
    fn test_coerce_date_unparsable_is_missing() {
        let config = AnalysisConfig::default();
        assert_eq!(coerce_date("", &config), None);
        assert_eq!(coerce_date("last tuesday", &config), None);
        assert_eq!(coerce_date("2022-13-40", &config), None);
    }

    #[test]
    fn test_normalize_hubspot() {
        let csv = "Survey Name,Rating,Date\nCareers NPS,9,2022-01-03\nCareers NPS,oops,2022-01-04\n,5,not a date\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        let frame = normalize_hubspot(&table, &AnalysisConfig::default());

        assert_eq!(frame.columns, ColumnPresence { score: true, date: true, group: true });
        assert_eq!(frame.responses.len(), 3);
        assert_eq!(frame.responses[0].survey_name.as_deref(), Some("Careers NPS"));
        assert_eq!(frame.responses[1].score, None);
        assert_eq!(frame.responses[2].survey_name, None);
        assert_eq!(frame.responses[2].date, None);
        assert_eq!(frame.cleaned().len(), 1);
    }

    #[test]
    fn test_normalize_form_uses_cohort() {
        let config = AnalysisConfig::default();
        let csv = format!(
            "\"{}\",\"{}\",{}\nMay 2022,10,2022-06-01\n",
            config.form.cohort, config.form.score, config.form.date
        );
        let table = parse_table(csv.as_bytes()).unwrap();
        let frame = normalize_form(&table, &config);

        let r = &frame.responses[0];
        assert_eq!(r.source, Source::GoogleForm);
        assert_eq!(r.cohort.as_deref(), Some("May 2022"));
        assert_eq!(r.survey_name, None);
        assert_eq!(r.dated_score(), Some((ymd(2022, 6, 1), 10.0)));
    }

    #[test]
    fn test_missing_columns_are_reported_not_fatal() {
        let table = parse_table(b"Score,When\n9,2022-01-01\n").unwrap();
        let frame = normalize_hubspot(&table, &AnalysisConfig::default());

        assert_eq!(frame.columns, ColumnPresence::default());
        assert_eq!(frame.responses.len(), 1);
        assert!(frame.cleaned().is_empty());
    }

    #[test]
    fn test_warning_message_names_column() {
        let w = Warning::missing_column(Source::HubSpot, "Date", "yearly breakdown");
        assert_eq!(w.source, Some(Source::HubSpot));
        assert!(w.to_string().contains("'Date'"));
        assert!(w.to_string().contains("HubSpot"));
    }
}
