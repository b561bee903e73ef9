//! Output formatting and persistence for analysis reports.
//!
//! Tables render as aligned plain text for the terminal, or persist as one
//! CSV file per table plus a `report.json` with everything.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::{AnalysisReport, GaugeReading, TrendSeries};

/// Serializes `rows` to CSV in memory, header row included.
fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV buffer: {}", e.error()))
}

/// Renders `rows` as a titled, column-aligned text table.
///
/// Column names come from the rows' serialized field names, so the output
/// headers match the CSV and JSON output. Missing values render blank.
pub fn render_table<T: Serialize>(title: &str, rows: &[T]) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    if rows.is_empty() {
        let _ = writeln!(out, "  (no rows)");
        return Ok(out);
    }

    let bytes = to_csv(rows)?;
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(bytes.as_slice());
    let mut grid: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        grid.push(record?.iter().map(str::to_string).collect());
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            grid.iter()
                .filter_map(|r| r.get(c))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (i, row) in grid.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        let _ = writeln!(out, "  {}", line.join(" | ").trim_end());
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let _ = writeln!(out, "  {}", rule.join("-+-"));
        }
    }

    Ok(out)
}

/// Renders the gauge reading with its interpretation.
pub fn render_gauge(gauge: &GaugeReading) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Annual NPS Score for {}", gauge.year);
    let _ = writeln!(
        out,
        "  Score: {} ({}) {}",
        gauge.score,
        gauge.band,
        gauge.band.color()
    );
    let _ = writeln!(out, "  Total responses: {}", gauge.responses);
    let _ = writeln!(out, "  Promoters (9-10): {}", gauge.promoters);
    let _ = writeln!(out, "  Passives (7-8): {}", gauge.passives);
    let _ = writeln!(out, "  Detractors (0-6): {}", gauge.detractors);
    out
}

pub fn render_trend(series: &TrendSeries) -> Result<String> {
    render_table(
        &format!("Quarterly vs Yearly NPS ({}; yearly plotted at Q4)", series.dataset),
        &series.points,
    )
}

/// Renders every table in the report, warnings first.
pub fn render_report(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {warning}");
    }
    if !report.warnings.is_empty() {
        out.push('\n');
    }

    let form_overall: Vec<_> = report.form_overall.iter().cloned().collect();
    let sections = [
        render_table("Initial Data Analysis by Survey", &report.hubspot_surveys)?,
        render_table("NPS Analysis by Survey", &report.hubspot_nps_surveys)?,
        render_table("CSAT Analysis by Survey", &report.hubspot_csat_surveys)?,
        render_table("Google Form NPS Analysis by Cohort", &report.form_cohorts)?,
        render_table("Google Form Combined NPS Analysis", &form_overall)?,
        render_table("HubSpot NPS by Year (CSAT removed)", &report.hubspot_yearly)?,
        render_table("Google Form NPS by Year", &report.form_yearly)?,
        render_table("Combined NPS by Year (HubSpot + Google Form)", &report.combined_yearly)?,
        render_table("HubSpot NPS by Quarter (CSAT removed)", &report.hubspot_quarterly)?,
        render_table("Google Form NPS by Quarter", &report.form_quarterly)?,
        render_table("Combined NPS by Quarter", &report.combined_quarterly)?,
    ];
    out.push_str(&sections.join("\n"));

    if let Some(gauge) = &report.latest_gauge {
        out.push('\n');
        out.push_str(&render_gauge(gauge));
    }

    Ok(out)
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");
    let bytes = to_csv(rows)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes one CSV per table and `report.json` into `dir`, creating it if needed.
///
/// Returns the paths written.
pub fn write_report_files(dir: &Path, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut written = Vec::new();

    macro_rules! table {
        ($name:expr, $rows:expr) => {
            let path = dir.join($name);
            write_csv(&path, $rows)?;
            written.push(path);
        };
    }

    let form_overall: Vec<_> = report.form_overall.iter().cloned().collect();
    table!("hubspot_surveys.csv", &report.hubspot_surveys);
    table!("hubspot_nps_surveys.csv", &report.hubspot_nps_surveys);
    table!("hubspot_csat_surveys.csv", &report.hubspot_csat_surveys);
    table!("form_cohorts.csv", &report.form_cohorts);
    table!("form_overall.csv", &form_overall);
    table!("hubspot_yearly.csv", &report.hubspot_yearly);
    table!("form_yearly.csv", &report.form_yearly);
    table!("combined_yearly.csv", &report.combined_yearly);
    table!("hubspot_quarterly.csv", &report.hubspot_quarterly);
    table!("form_quarterly.csv", &report.form_quarterly);
    table!("combined_quarterly.csv", &report.combined_quarterly);

    for series in &report.trends {
        let slug = series.dataset.to_lowercase().replace(' ', "_");
        table!(format!("trend_{slug}.csv"), &series.points);
    }

    let json_path = dir.join("report.json");
    write_json(&json_path, report)?;
    written.push(json_path);

    info!(dir = %dir.display(), files = written.len(), "Report files written");
    Ok(written)
}
