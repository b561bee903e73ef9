//! Row types produced by the aggregation pipeline.
//!
//! Field renames are the column headers the dashboard displays, so CSV and
//! JSON output carry them verbatim.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::analyzers::grade::NpsBand;
use crate::normalize::Warning;

/// Descriptive statistics and NPS for one survey, one cohort, or a whole source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyAggregate {
    /// `None` for the whole-dataset summary, which has no grouping key.
    #[serde(rename = "Survey Name", skip_serializing_if = "Option::is_none")]
    pub survey_name: Option<String>,
    #[serde(rename = "Number of Responses")]
    pub responses: usize,
    #[serde(rename = "First Appearance")]
    pub first_appearance: Option<NaiveDate>,
    #[serde(rename = "Last Appearance")]
    pub last_appearance: Option<NaiveDate>,
    #[serde(rename = "Min Score")]
    pub min_score: Option<i64>,
    #[serde(rename = "Max Score")]
    pub max_score: Option<i64>,
    #[serde(rename = "Mean")]
    pub mean: Option<f64>,
    #[serde(rename = "Mode")]
    pub mode: Option<i64>,
    #[serde(rename = "Median")]
    pub median: Option<i64>,
    #[serde(rename = "Promoters (9-10)")]
    pub promoters: usize,
    #[serde(rename = "Passives (7-8)")]
    pub passives: usize,
    #[serde(rename = "Detractors (0-6)")]
    pub detractors: usize,
    #[serde(rename = "NPS Score")]
    pub nps: Option<i64>,
}

/// A survey answered on the 0-2 scale, reported as CSAT instead of NPS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsatAggregate {
    #[serde(rename = "Survey Name")]
    pub survey_name: String,
    #[serde(rename = "Number of Responses")]
    pub responses: usize,
    #[serde(rename = "First Appearance")]
    pub first_appearance: Option<NaiveDate>,
    #[serde(rename = "Last Appearance")]
    pub last_appearance: Option<NaiveDate>,
    #[serde(rename = "Min Score")]
    pub min_score: Option<i64>,
    #[serde(rename = "Max Score")]
    pub max_score: Option<i64>,
    #[serde(rename = "Mean")]
    pub mean: Option<f64>,
    #[serde(rename = "Mode")]
    pub mode: Option<i64>,
    #[serde(rename = "Median")]
    pub median: Option<i64>,
    #[serde(rename = "Positive (2)")]
    pub positives: usize,
    /// Whole-number percentage, e.g. `"50%"`.
    #[serde(rename = "CSAT Score")]
    pub csat_score: String,
    #[serde(skip)]
    pub csat: Option<i64>,
}

/// Calendar quarter key, ordered by year then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuarterKey {
    pub year: i32,
    pub quarter: u32,
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyAggregate {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Responses")]
    pub responses: usize,
    #[serde(rename = "Promoters (9-10)")]
    pub promoters: usize,
    #[serde(rename = "Passives (7-8)")]
    pub passives: usize,
    #[serde(rename = "Detractors (0-6)")]
    pub detractors: usize,
    #[serde(rename = "NPS Score")]
    pub nps: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterlyAggregate {
    #[serde(skip)]
    pub key: QuarterKey,
    /// `"{year}-Q{quarter}"`.
    #[serde(rename = "Quarter")]
    pub label: String,
    #[serde(rename = "Responses")]
    pub responses: usize,
    #[serde(rename = "Promoters (9-10)")]
    pub promoters: usize,
    #[serde(rename = "Passives (7-8)")]
    pub passives: usize,
    #[serde(rename = "Detractors (0-6)")]
    pub detractors: usize,
    #[serde(rename = "NPS Score")]
    pub nps: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodType {
    Quarterly,
    Yearly,
}

/// One point of the trend line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Quarter label; yearly points sit at `"{year}-Q4"`.
    pub quarter_year: String,
    pub value: i64,
    pub period: PeriodType,
}

/// Which responses feed a trend series or gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendDataset {
    Combined,
    HubSpotOnly,
    FormsOnly,
}

impl TrendDataset {
    pub const ALL: [TrendDataset; 3] = [
        TrendDataset::Combined,
        TrendDataset::HubSpotOnly,
        TrendDataset::FormsOnly,
    ];
}

impl fmt::Display for TrendDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDataset::Combined => "Combined",
            TrendDataset::HubSpotOnly => "HubSpot Only",
            TrendDataset::FormsOnly => "Forms Only",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub dataset: String,
    pub points: Vec<TrendPoint>,
}

/// Single-year NPS reading for the annual gauge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeReading {
    pub year: i32,
    pub score: i64,
    pub band: NpsBand,
    pub responses: usize,
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
}

/// Every table and series derived from one load of the two exports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub warnings: Vec<Warning>,
    /// All HubSpot surveys before CSAT surveys are split out.
    pub hubspot_surveys: Vec<SurveyAggregate>,
    pub hubspot_nps_surveys: Vec<SurveyAggregate>,
    pub hubspot_csat_surveys: Vec<CsatAggregate>,
    /// Form responses grouped by cohort.
    pub form_cohorts: Vec<SurveyAggregate>,
    /// Form responses as a single group.
    pub form_overall: Option<SurveyAggregate>,
    pub hubspot_yearly: Vec<YearlyAggregate>,
    pub form_yearly: Vec<YearlyAggregate>,
    pub combined_yearly: Vec<YearlyAggregate>,
    pub hubspot_quarterly: Vec<QuarterlyAggregate>,
    pub form_quarterly: Vec<QuarterlyAggregate>,
    pub combined_quarterly: Vec<QuarterlyAggregate>,
    pub trends: Vec<TrendSeries>,
    /// Years with combined responses, newest first.
    pub available_years: Vec<i32>,
    /// Gauge for the newest year.
    pub latest_gauge: Option<GaugeReading>,
}
