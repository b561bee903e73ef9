//! Analysis settings: thresholds, date formats and per-source column names.
//!
//! Stored as a JSON object on disk; every field is optional and falls back to
//! the defaults below:
//! ```json
//! {
//!   "min_year": 2019,
//!   "hubspot": { "score": "Rating", "date": "Date", "survey_name": "Survey Name" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Column names for the CRM survey export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSpotColumns {
    pub survey_name: String,
    pub score: String,
    pub date: String,
}

impl Default for HubSpotColumns {
    fn default() -> Self {
        Self {
            survey_name: "Survey Name".to_string(),
            score: "Rating".to_string(),
            date: "Date".to_string(),
        }
    }
}

/// Column names for the form export, which has a cohort but no survey name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormColumns {
    pub cohort: String,
    pub score: String,
    pub date: String,
}

impl Default for FormColumns {
    fn default() -> Self {
        Self {
            cohort: "What's your cohort?".to_string(),
            score: "How likely are you to recommend the Makers Academy Careers Team to future cohorts?"
                .to_string(),
            date: "Conversion Date".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Earliest calendar year kept by the yearly and quarterly tables.
    pub min_year: i32,
    /// Inclusive score range kept by the yearly and quarterly tables.
    pub min_score: f64,
    pub max_score: f64,
    /// A survey whose highest observed score equals this is reported as CSAT.
    pub csat_scale_max: f64,
    /// chrono formats tried, in order, for values carrying a time of day.
    ///
    /// Slash dates read month-first; day-first only applies when the first
    /// field cannot be a month. List `%d/%m/%Y` first to read day-first.
    pub datetime_formats: Vec<String>,
    /// chrono formats tried, in order, for date-only values.
    pub date_formats: Vec<String>,
    pub hubspot: HubSpotColumns,
    pub form: FormColumns,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_year: 2019,
            min_score: 0.0,
            max_score: 10.0,
            csat_scale_max: 2.0,
            datetime_formats: [
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            date_formats: ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            hubspot: HubSpotColumns::default(),
            form: FormColumns::default(),
        }
    }
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
        Self::from_json(&content).with_context(|| format!("invalid config {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Uses `path` when given, then `NPS_CONFIG`, then the built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => match std::env::var("NPS_CONFIG") {
                Ok(p) if !p.is_empty() => Self::load(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn score_in_range(&self, score: f64) -> bool {
        score >= self.min_score && score <= self.max_score
    }
}
