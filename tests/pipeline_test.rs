mod common;

use _core::aggregation::Panel;
use _core::controller::run_pipeline;
use _core::filters::{Choice, FilterState, SliderRange};
use _core::visualization::ChartKind;
use common::{csv_where, dataset, full_csv, required_only_csv, MIN_SALARY};

#[test]
fn default_filters_show_the_whole_workforce() {
    let data = dataset(&full_csv());
    let report = run_pipeline(&data, &FilterState::default(), 100).unwrap();

    assert_eq!(report.kpis.total, 10);
    assert_eq!(report.kpis.left_count, 3);
    assert_eq!(report.kpis.attrition_rate, 30.0);
    assert_eq!(report.kpis.avg_monthly_salary, 52100.0 / 10.0);
    assert_eq!(report.charts.len(), 4);

    let panels: Vec<_> = report.charts.iter().map(|c| c.panel).collect();
    assert_eq!(
        panels,
        vec![
            Panel::DepartmentAttrition,
            Panel::AgeDistribution,
            Panel::SalaryDistribution,
            Panel::TenureDistribution
        ]
    );
    assert_eq!(report.preview.height(), 10);
}

#[test]
fn salary_below_minimum_empties_the_view() {
    let data = dataset(&full_csv());
    let state = FilterState {
        salary: Some(SliderRange::new(0, MIN_SALARY - 1)),
        ..FilterState::default()
    };
    let report = run_pipeline(&data, &state, 100).unwrap();

    assert_eq!(report.kpis.total, 0);
    assert_eq!(report.kpis.left_count, 0);
    assert_eq!(report.kpis.attrition_rate, 0.0);
    assert_eq!(report.kpis.avg_monthly_salary, 0.0);
    assert!(report.charts.is_empty());
    assert_eq!(report.preview.height(), 0);
}

#[test]
fn salary_below_zero_minimum_empties_the_view() {
    let data = dataset("HR export\n部門,離職,月薪\nSales,是,0\nHR,否,500\n");
    let state = FilterState {
        salary: Some(SliderRange::new(0, -1)),
        ..FilterState::default()
    };
    let report = run_pipeline(&data, &state, 100).unwrap();

    assert_eq!(report.kpis.total, 0);
    assert_eq!(report.kpis.left_count, 0);
    assert_eq!(report.kpis.attrition_rate, 0.0);
    assert!(report.charts.is_empty());
    assert_eq!(report.preview.height(), 0);
}

#[test]
fn required_columns_only_draws_department_and_salary_charts() {
    let data = dataset(&required_only_csv());
    let report = run_pipeline(&data, &FilterState::default(), 100).unwrap();

    assert_eq!(report.kpis.total, 10);
    let panels: Vec<_> = report.charts.iter().map(|c| c.panel).collect();
    // monthly_salary is a required column, so the salary box plot stays.
    assert_eq!(
        panels,
        vec![Panel::DepartmentAttrition, Panel::SalaryDistribution]
    );
    assert_eq!(report.charts[0].kind, ChartKind::StackedBar);
}

#[test]
fn legacy_attrition_header_is_renamed() {
    let csv = csv_where(
        |_| true,
        |h| if h == "離職" { "流失".to_string() } else { h.to_string() },
    );
    let data = dataset(&csv);
    assert!(data.table.column("attrition").is_ok());

    let report = run_pipeline(&data, &FilterState::default(), 100).unwrap();
    assert_eq!(report.kpis.total, 10);
    assert_eq!(report.kpis.left_count, 3);
}

#[test]
fn overtime_filter() {
    let data = dataset(&full_csv());
    let state = FilterState {
        overtime: Choice::parse("yes"),
        ..FilterState::default()
    };
    let report = run_pipeline(&data, &state, 100).unwrap();

    assert_eq!(report.kpis.total, 4);
    assert_eq!(report.kpis.left_count, 3);
    assert_eq!(report.kpis.attrition_rate, 75.0);
}

#[test]
fn top_satisfaction_filter() {
    let data = dataset(&full_csv());
    let state = FilterState {
        satisfaction: Some(SliderRange::new(4, 4)),
        ..FilterState::default()
    };
    let report = run_pipeline(&data, &state, 100).unwrap();

    assert_eq!(report.kpis.total, 2);
    assert_eq!(report.kpis.left_count, 0);
    assert_eq!(report.kpis.attrition_rate, 0.0);
}

#[test]
fn filters_combine_across_sections() {
    let data = dataset(&full_csv());
    let state = FilterState {
        dept: _core::filters::Selection::only(["R&D"]),
        gender: Choice::parse("Male"),
        age: Some(SliderRange::new(30, 60)),
        ..FilterState::default()
    };
    let report = run_pipeline(&data, &state, 100).unwrap();

    // R&D men aged 30+: rows 3, 6 and 9.
    assert_eq!(report.kpis.total, 3);
    assert_eq!(report.kpis.left_count, 1);
}
