use polars::prelude::*;
use serde::Serialize;

use crate::adapter::ColumnPresence;
use crate::error::DashboardError;
use crate::schema::{chart, employee, flag, Attribute};

/// Headline metrics of the filtered view. Always defined, zero on an empty view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub total: usize,
    pub left_count: usize,
    /// Percentage of rows with attrition = yes; 0.0 when the view is empty.
    pub attrition_rate: f64,
    /// Mean monthly salary; 0.0 when the view is empty or the column absent.
    pub avg_monthly_salary: f64,
}

/// The four chart panels of the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    DepartmentAttrition,
    AgeDistribution,
    SalaryDistribution,
    TenureDistribution,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::DepartmentAttrition,
        Panel::AgeDistribution,
        Panel::SalaryDistribution,
        Panel::TenureDistribution,
    ];

    /// Column the panel needs besides attrition.
    pub fn attribute(self) -> Attribute {
        match self {
            Panel::DepartmentAttrition => Attribute::Department,
            Panel::AgeDistribution => Attribute::Age,
            Panel::SalaryDistribution => Attribute::MonthlySalary,
            Panel::TenureDistribution => Attribute::YearsAtCompany,
        }
    }
}

/// Data behind one chart.
#[derive(Debug, Clone)]
pub struct ChartDataset {
    pub panel: Panel,
    pub frame: DataFrame,
    /// Set when the filtered view had no rows; the view builder skips these.
    pub empty: bool,
}

/// Datasets for every panel whose column is present, in grid order.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub datasets: Vec<ChartDataset>,
}

/// Compute the KPI strip and the chart datasets from the filtered view only.
pub fn aggregate(
    view: &DataFrame,
    presence: &ColumnPresence,
) -> Result<(Kpis, ChartData), DashboardError> {
    let kpis = compute_kpis(view, presence)?;
    let empty = kpis.total == 0;

    let mut datasets = Vec::new();
    for panel in Panel::ALL {
        if !presence.contains(panel.attribute()) {
            continue;
        }
        let frame = match panel {
            Panel::DepartmentAttrition => department_attrition(view)?,
            _ => paired_with_attrition(view, panel.attribute())?,
        };
        datasets.push(ChartDataset {
            panel,
            frame,
            empty,
        });
    }

    Ok((kpis, ChartData { datasets }))
}

pub fn compute_kpis(view: &DataFrame, presence: &ColumnPresence) -> Result<Kpis, DashboardError> {
    let total = view.height();
    if total == 0 {
        return Ok(Kpis {
            total: 0,
            left_count: 0,
            attrition_rate: 0.0,
            avg_monthly_salary: 0.0,
        });
    }

    let left_count = view
        .column(employee::ATTRITION)?
        .str()?
        .into_iter()
        .filter(|v| *v == Some(flag::YES))
        .count();

    let avg_monthly_salary = if presence.contains(Attribute::MonthlySalary) {
        view.column(employee::MONTHLY_SALARY)?
            .as_materialized_series()
            .mean()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    Ok(Kpis {
        total,
        left_count,
        attrition_rate: attrition_rate(left_count, total),
        avg_monthly_salary,
    })
}

/// `100 * left / total`, or 0.0 for an empty population.
pub fn attrition_rate(left_count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (left_count as f64 * 100.0) / total as f64
    }
}

/// Row counts per (department, attrition); combinations with no rows are absent.
fn department_attrition(view: &DataFrame) -> Result<DataFrame, DashboardError> {
    let df = view
        .clone()
        .lazy()
        .filter(
            col(employee::DEPARTMENT)
                .is_not_null()
                .and(col(employee::ATTRITION).is_not_null()),
        )
        .group_by([col(employee::DEPARTMENT), col(employee::ATTRITION)])
        .agg([len().alias(chart::COUNT)])
        .sort_by_exprs(
            [col(employee::DEPARTMENT), col(employee::ATTRITION)],
            SortMultipleOptions::default(),
        )
        .collect()?;
    Ok(df)
}

/// Raw values of `attribute` next to the attrition label, row for row.
fn paired_with_attrition(view: &DataFrame, attribute: Attribute) -> Result<DataFrame, DashboardError> {
    let df = view
        .clone()
        .lazy()
        .select([col(attribute.name()), col(employee::ATTRITION)])
        .collect()?;
    Ok(df)
}
