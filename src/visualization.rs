/// Visualization module: turns aggregated datasets into chart specifications.
///
/// A `ChartSpec` is everything the rendering backend needs to draw one
/// panel: chart kind, encodings, the fixed attrition color map, layout
/// extras and the dataset itself. Rendering happens outside this crate;
/// `ChartSpec::to_json` is the hand-off format.
use serde::Serialize;
use serde_json::{json, Map, Value};

use polars::prelude::*;

use crate::aggregation::{ChartData, ChartDataset, Panel};
use crate::error::DashboardError;
use crate::schema::{chart, employee, palette};

pub const AGE_BINS: u32 = 15;
const AGE_OPACITY: f64 = 0.7;

// ── Spec types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    StackedBar,
    Histogram,
    Boxplot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Overlay,
    Stack,
}

/// Attrition label → color. Constant across every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorMap {
    pub yes: &'static str,
    pub no: &'static str,
}

pub const ATTRITION_COLORS: ColorMap = ColorMap {
    yes: palette::YES,
    no: palette::NO,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Extras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Print values on the bars.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub text_auto: bool,
}

/// Position in the 2×2 chart grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSlot {
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub panel: Panel,
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: Option<String>,
    pub color: String,
    pub orientation: Orientation,
    pub color_map: ColorMap,
    pub extras: Extras,
    pub slot: GridSlot,
    #[serde(skip)]
    pub data: DataFrame,
}

impl ChartSpec {
    /// Spec plus its dataset as `{column: [values...]}`.
    pub fn to_json(&self) -> Result<String, DashboardError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("data".to_string(), frame_to_json(&self.data)?);
        }
        Ok(serde_json::to_string(&value)?)
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// One spec per non-empty dataset, in grid order.
pub fn build_views(data: &ChartData) -> Vec<ChartSpec> {
    data.datasets
        .iter()
        .filter(|d| !d.empty)
        .map(build_view)
        .collect()
}

fn build_view(dataset: &ChartDataset) -> ChartSpec {
    let attrition = employee::ATTRITION.to_string();
    let base = |kind, title: &str, x: &str, y: Option<&str>, slot| ChartSpec {
        panel: dataset.panel,
        kind,
        title: title.to_string(),
        x: x.to_string(),
        y: y.map(str::to_string),
        color: attrition.clone(),
        orientation: Orientation::Vertical,
        color_map: ATTRITION_COLORS,
        extras: Extras::default(),
        slot,
        data: dataset.frame.clone(),
    };

    match dataset.panel {
        Panel::DepartmentAttrition => ChartSpec {
            orientation: Orientation::Horizontal,
            extras: Extras {
                barmode: Some(BarMode::Stack),
                text_auto: true,
                ..Extras::default()
            },
            ..base(
                ChartKind::StackedBar,
                "Attrition by Department",
                chart::COUNT,
                Some(employee::DEPARTMENT),
                GridSlot { row: 0, col: 0 },
            )
        },
        Panel::AgeDistribution => ChartSpec {
            extras: Extras {
                nbins: Some(AGE_BINS),
                barmode: Some(BarMode::Overlay),
                opacity: Some(AGE_OPACITY),
                text_auto: false,
            },
            ..base(
                ChartKind::Histogram,
                "Age Distribution by Attrition",
                employee::AGE,
                None,
                GridSlot { row: 0, col: 1 },
            )
        },
        Panel::SalaryDistribution => base(
            ChartKind::Boxplot,
            "Monthly Salary by Attrition",
            employee::ATTRITION,
            Some(employee::MONTHLY_SALARY),
            GridSlot { row: 1, col: 0 },
        ),
        Panel::TenureDistribution => base(
            ChartKind::Histogram,
            "Years at Company by Attrition",
            employee::YEARS_AT_COMPANY,
            None,
            GridSlot { row: 1, col: 1 },
        ),
    }
}

// ── JSON serialization helpers ──────────────────────────────────────────────

fn frame_to_json(df: &DataFrame) -> Result<Value, DashboardError> {
    let mut columns = Map::new();
    for column in df.get_columns() {
        let s = column.as_materialized_series();
        let values: Vec<Value> = match s.dtype() {
            DataType::String => s.str()?.into_iter().map(|v| json!(v)).collect(),
            dtype if dtype.is_integer() => s
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(|v| json!(v))
                .collect(),
            _ => s
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| json!(v))
                .collect(),
        };
        columns.insert(s.name().to_string(), Value::Array(values));
    }
    Ok(Value::Object(columns))
}
