use nps_trends::analyzers::analyzer::analyze;
use nps_trends::analyzers::types::PeriodType;
use nps_trends::config::AnalysisConfig;
use nps_trends::output::render_report;
use nps_trends::parser::parse_table;

fn fixtures() -> (nps_trends::parser::RawTable, nps_trends::parser::RawTable) {
    let hubspot = parse_table(include_bytes!("fixtures/hubspot.csv")).expect("hubspot fixture");
    let form = parse_table(include_bytes!("fixtures/google_form.csv")).expect("form fixture");
    (hubspot, form)
}

#[test]
fn test_full_pipeline() {
    let (hubspot, form) = fixtures();
    let report = analyze(Some(&hubspot), Some(&form), &AnalysisConfig::default());

    assert!(report.warnings.is_empty());

    let names: Vec<_> = report
        .hubspot_surveys
        .iter()
        .filter_map(|s| s.survey_name.as_deref())
        .collect();
    assert_eq!(
        names,
        vec!["Careers Team NPS", "Employer Partner NPS", "Legacy Pilot", "Workshop CSAT"]
    );

    let careers = &report.hubspot_surveys[0];
    assert_eq!(careers.responses, 6);
    assert_eq!((careers.promoters, careers.passives, careers.detractors), (2, 1, 2));
    assert_eq!(careers.nps, Some(0));

    assert_eq!(report.hubspot_nps_surveys.len(), 3);
    assert_eq!(report.hubspot_csat_surveys.len(), 1);
    assert_eq!(report.hubspot_csat_surveys[0].csat_score, "50%");
}

#[test]
fn test_yearly_tables_and_combination() {
    let (hubspot, form) = fixtures();
    let report = analyze(Some(&hubspot), Some(&form), &AnalysisConfig::default());

    let hub_years: Vec<_> = report.hubspot_yearly.iter().map(|y| (y.year, y.responses, y.nps)).collect();
    // 2017 is below the floor; CSAT rows are excluded from 2022.
    assert_eq!(hub_years, vec![(2019, 3, Some(33)), (2020, 2, Some(-50)), (2022, 3, Some(66))]);

    let form_years: Vec<_> = report.form_yearly.iter().map(|y| (y.year, y.responses, y.nps)).collect();
    assert_eq!(form_years, vec![(2019, 2, Some(100)), (2020, 1, Some(-100)), (2022, 1, Some(100))]);

    let combined: Vec<_> = report
        .combined_yearly
        .iter()
        .map(|y| (y.year, y.responses, y.promoters, y.detractors, y.nps))
        .collect();
    assert_eq!(
        combined,
        vec![
            (2019, 5, 4, 1, Some(60)),
            (2020, 3, 0, 2, Some(-66)),
            (2022, 4, 3, 0, Some(75)),
        ]
    );
}

#[test]
fn test_quarter_labels_and_trend_series() {
    let (hubspot, form) = fixtures();
    let report = analyze(Some(&hubspot), Some(&form), &AnalysisConfig::default());

    let labels: Vec<_> = report.hubspot_quarterly.iter().map(|q| q.label.as_str()).collect();
    assert!(labels.contains(&"2022-Q2"));
    assert!(labels.contains(&"2022-Q4"));

    let combined = &report.trends[0];
    assert_eq!(combined.dataset, "Combined");
    let sorted = combined
        .points
        .windows(2)
        .all(|w| w[0].quarter_year <= w[1].quarter_year);
    assert!(sorted);
    assert!(combined
        .points
        .iter()
        .any(|p| p.period == PeriodType::Yearly && p.quarter_year == "2017-Q4"));
}

#[test]
fn test_form_cohort_and_overall_tables() {
    let (hubspot, form) = fixtures();
    let report = analyze(Some(&hubspot), Some(&form), &AnalysisConfig::default());

    assert_eq!(report.form_cohorts.len(), 3);
    let march = report
        .form_cohorts
        .iter()
        .find(|c| c.survey_name.as_deref() == Some("March 2020"))
        .unwrap();
    assert_eq!(march.responses, 2);
    assert_eq!(march.nps, Some(-100));

    let overall = report.form_overall.as_ref().unwrap();
    assert_eq!(overall.responses, 5);
    assert_eq!(overall.nps, Some(40));
    assert_eq!(overall.mode, Some(10));
}

#[test]
fn test_render_report_has_every_section() {
    let (hubspot, form) = fixtures();
    let report = analyze(Some(&hubspot), Some(&form), &AnalysisConfig::default());
    let text = render_report(&report).unwrap();

    for title in [
        "Initial Data Analysis by Survey",
        "CSAT Analysis by Survey",
        "Google Form Combined NPS Analysis",
        "Combined NPS by Year (HubSpot + Google Form)",
        "Annual NPS Score for 2022",
    ] {
        assert!(text.contains(title), "missing section {title}");
    }
}
