use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};
use pyo3_polars::PyDataFrame;

use crate::controller::{Dashboard, DashboardConfig, Screen, SessionState, UiHost};
use crate::error::DashboardError;
use crate::filters::{FilterId, FilterOptions, FilterShape, FilterState, FilterValue, SidebarSection};
use crate::source::Upload;
use crate::visualization::ChartSpec;

/// Python face of the dashboard controller. The Python page is the UI host:
/// it passes the widget values on every rerun and renders what comes back.
#[pyclass(name = "AttritionDashboard")]
pub struct DashboardModel {
    inner: Dashboard,
}

/// Widget snapshot handed over by one Python call.
struct PyHost {
    filters: FilterState,
    upload: Option<Upload>,
}

impl UiHost for PyHost {
    fn upload(&self) -> Option<Upload> {
        self.upload.clone()
    }

    fn filter_state(&self) -> FilterState {
        self.filters.clone()
    }
}

#[pymethods]
impl DashboardModel {
    #[new]
    #[pyo3(signature = (default_source=None, banner_rows=1, preview_rows=100))]
    fn new(default_source: Option<String>, banner_rows: usize, preview_rows: usize) -> Self {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            default_source: default_source
                .map(Into::into)
                .unwrap_or(defaults.default_source),
            banner_rows,
            preview_rows,
        };
        Self {
            inner: Dashboard::new(config),
        }
    }

    /// "awaiting_data" or "ready".
    #[getter]
    fn state(&self) -> &'static str {
        match self.inner.state() {
            SessionState::AwaitingData => "awaiting_data",
            SessionState::Ready => "ready",
        }
    }

    /// Run the pipeline for the current widget values.
    ///
    /// Args:
    ///     filters: dict keyed by filter id ("dept", "role", "overtime", "travel",
    ///              "satisfaction", "salary", "age", "gender"). Missing ids admit all rows.
    ///     upload:  optional (file_name, bytes) from the upload widget.
    ///
    /// Returns a dict with "status" and, depending on it, "warning", "message"
    /// or "kpis" / "charts" / "filtered" / "preview" / "options" / "sidebar".
    #[pyo3(signature = (filters=None, upload=None))]
    fn on_event<'py>(
        &mut self,
        py: Python<'py>,
        filters: Option<&Bound<'py, PyDict>>,
        upload: Option<(String, Bound<'py, PyBytes>)>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let host = PyHost {
            filters: match filters {
                Some(dict) => Self::parse_filters(dict)?,
                None => FilterState::default(),
            },
            upload: upload.map(|(name, bytes)| Upload::new(name, bytes.as_bytes())),
        };

        let out = PyDict::new(py);
        match self.inner.on_event(&host) {
            Screen::AwaitingData { warning } => {
                out.set_item("status", "awaiting_data")?;
                out.set_item("warning", warning)?;
            }
            Screen::Failed { message } => {
                out.set_item("status", "failed")?;
                out.set_item("message", message)?;
            }
            Screen::Ready { dataset, report } => {
                let kpis = PyDict::new(py);
                kpis.set_item("total", report.kpis.total)?;
                kpis.set_item("left_count", report.kpis.left_count)?;
                kpis.set_item("attrition_rate", report.kpis.attrition_rate)?;
                kpis.set_item("avg_monthly_salary", report.kpis.avg_monthly_salary)?;

                let charts = report
                    .charts
                    .iter()
                    .map(ChartSpec::to_json)
                    .collect::<Result<Vec<String>, DashboardError>>()?;

                out.set_item("status", "ready")?;
                out.set_item("kpis", kpis)?;
                out.set_item("charts", charts)?;
                out.set_item("filtered", PyDataFrame(report.filtered.clone()))?;
                out.set_item("preview", PyDataFrame(report.preview.clone()))?;
                out.set_item("options", Self::options_to_dict(py, &dataset.options)?)?;
                out.set_item("sidebar", Self::sidebar_to_list(&dataset.sidebar))?;
            }
        }
        Ok(out)
    }

    /// Reference table of the current source, once loaded.
    #[getter]
    fn reference_df(&self) -> Option<PyDataFrame> {
        self.inner.dataset().map(|d| PyDataFrame(d.table.clone()))
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl DashboardModel {
    fn parse_filters(dict: &Bound<'_, PyDict>) -> PyResult<FilterState> {
        let mut state = FilterState::default();
        for (key, value) in dict.iter() {
            let key: String = key.extract()?;
            let id: FilterId = key
                .parse()
                .map_err(|e: DashboardError| PyValueError::new_err(e.to_string()))?;

            let is_all = value.is_none()
                || value
                    .extract::<String>()
                    .is_ok_and(|s| s.eq_ignore_ascii_case("all"));

            let parsed = if is_all {
                FilterValue::All
            } else {
                match id.shape() {
                    FilterShape::Members => FilterValue::AnyOf(value.extract()?),
                    FilterShape::Choice => FilterValue::Choice(value.extract()?),
                    FilterShape::Range => {
                        let (lo, hi): (i64, i64) = value.extract()?;
                        FilterValue::Between(lo, hi)
                    }
                }
            };
            state
                .set(id, parsed)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
        }
        Ok(state)
    }

    fn options_to_dict<'py>(
        py: Python<'py>,
        options: &FilterOptions,
    ) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for id in FilterId::ALL {
            match id.shape() {
                FilterShape::Members | FilterShape::Choice => {
                    if let Some(labels) = options.labels(id) {
                        dict.set_item(id.as_str(), labels.to_vec())?;
                    }
                }
                FilterShape::Range => {
                    if let Some(domain) = options.domain(id) {
                        dict.set_item(id.as_str(), (domain.lo, domain.hi))?;
                    }
                }
            }
        }
        Ok(dict)
    }

    fn sidebar_to_list(sections: &[SidebarSection]) -> Vec<(&'static str, Vec<&'static str>)> {
        sections
            .iter()
            .map(|s| {
                (
                    s.section.title(),
                    s.filters.iter().map(|id| id.as_str()).collect(),
                )
            })
            .collect()
    }
}
