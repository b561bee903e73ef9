//! Trend line and annual gauge.
//!
//! These views use a simpler NPS: `(promoters - detractors) / total * 100`
//! rounded half to even, with closed tier bounds. It deliberately differs
//! from the truncated table NPS and the two are not interchangeable.

use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};

use crate::analyzers::grade::grade;
use crate::analyzers::period::{DatedScore, quarter_of};
use crate::analyzers::tier::TierCounts;
use crate::analyzers::types::{GaugeReading, PeriodType, TrendPoint};

/// Rounded NPS for the trend views. Empty input scores 0.
pub fn trend_nps(scores: &[f64]) -> i64 {
    if scores.is_empty() {
        return 0;
    }
    let counts = TierCounts::from_period_scores(scores);
    let net = counts.promoters as f64 - counts.detractors as f64;
    (net / scores.len() as f64 * 100.0).round_ties_even() as i64
}

/// Quarterly and yearly trend points in one chronologically sortable series.
///
/// Yearly points are labelled `"{year}-Q4"` so they plot at the year's last
/// quarter. The sort is stable: at a shared label the quarterly point comes
/// first.
pub fn trend_series(rows: &[DatedScore]) -> Vec<TrendPoint> {
    let mut by_quarter: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for &(date, score) in rows {
        by_quarter
            .entry(quarter_of(date).to_string())
            .or_default()
            .push(score);
        by_year.entry(date.year()).or_default().push(score);
    }

    let quarterly = by_quarter.into_iter().map(|(label, scores)| TrendPoint {
        quarter_year: label,
        value: trend_nps(&scores),
        period: PeriodType::Quarterly,
    });
    let yearly = by_year.into_iter().map(|(year, scores)| TrendPoint {
        quarter_year: format!("{year}-Q4"),
        value: trend_nps(&scores),
        period: PeriodType::Yearly,
    });

    let mut points: Vec<TrendPoint> = quarterly.chain(yearly).collect();
    points.sort_by(|a, b| a.quarter_year.cmp(&b.quarter_year));
    points
}

/// Years present in `rows`, newest first.
pub fn available_years(rows: &[DatedScore]) -> Vec<i32> {
    let years: BTreeSet<i32> = rows.iter().map(|(d, _)| d.year()).collect();
    years.into_iter().rev().collect()
}

/// Gauge reading for `year`, or `None` when the year has no responses.
pub fn gauge_for_year(rows: &[DatedScore], year: i32) -> Option<GaugeReading> {
    let scores: Vec<f64> = rows
        .iter()
        .filter(|(d, _)| d.year() == year)
        .map(|&(_, s)| s)
        .collect();
    if scores.is_empty() {
        return None;
    }

    let counts = TierCounts::from_period_scores(&scores);
    let score = trend_nps(&scores);
    Some(GaugeReading {
        year,
        score,
        band: grade(score),
        responses: scores.len(),
        promoters: counts.promoters,
        passives: counts.passives,
        detractors: counts.detractors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::NpsBand;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trend_nps_rounds_where_tables_truncate() {
        // 2 promoters, 1 detractor of 3: 33.33 -> 33 either way.
        assert_eq!(trend_nps(&[9.0, 10.0, 4.0]), 33);
        // 2 of 3 promoters: 66.67 rounds to 67; the tables would truncate to 66.
        assert_eq!(trend_nps(&[9.0, 10.0, 8.0]), 67);
        // -12.5 ties to even.
        assert_eq!(trend_nps(&[6.0, 7.0, 7.0, 7.0, 8.0, 8.0, 8.0, 8.0]), -12);
        assert_eq!(trend_nps(&[]), 0);
    }

    #[test]
    fn test_trend_series_orders_and_tags_points() {
        let rows = vec![
            (ymd(2022, 12, 31), 10.0),
            (ymd(2022, 5, 15), 0.0),
            (ymd(2021, 2, 1), 9.0),
        ];
        let series = trend_series(&rows);
        let view: Vec<_> = series
            .iter()
            .map(|p| (p.quarter_year.as_str(), p.value, p.period))
            .collect();

        assert_eq!(
            view,
            vec![
                ("2021-Q1", 100, PeriodType::Quarterly),
                ("2021-Q4", 100, PeriodType::Yearly),
                ("2022-Q2", -100, PeriodType::Quarterly),
                ("2022-Q4", 100, PeriodType::Quarterly),
                ("2022-Q4", 0, PeriodType::Yearly),
            ]
        );
    }

    #[test]
    fn test_available_years_newest_first() {
        let rows = vec![
            (ymd(2020, 1, 1), 9.0),
            (ymd(2023, 1, 1), 9.0),
            (ymd(2020, 5, 1), 2.0),
        ];
        assert_eq!(available_years(&rows), vec![2023, 2020]);
    }

    #[test]
    fn test_gauge_for_year() {
        let rows = vec![
            (ymd(2023, 1, 1), 10.0),
            (ymd(2023, 4, 1), 9.0),
            (ymd(2023, 7, 1), 7.0),
            (ymd(2023, 10, 1), 2.0),
            (ymd(2022, 1, 1), 0.0),
        ];
        let g = gauge_for_year(&rows, 2023).unwrap();

        assert_eq!(g.responses, 4);
        assert_eq!((g.promoters, g.passives, g.detractors), (2, 1, 1));
        assert_eq!(g.score, 25);
        assert_eq!(g.band, NpsBand::Good);

        assert_eq!(gauge_for_year(&rows, 2022).unwrap().band, NpsBand::NeedsImprovement);
        assert_eq!(gauge_for_year(&rows, 1999), None);
    }
}
