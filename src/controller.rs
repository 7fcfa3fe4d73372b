//! Reactive controller: one pipeline run per UI event.
//!
//! The controller owns the session state and the memoized schema adapter
//! output. Each event snapshots the widget values from the host, resolves
//! the source, reuses the adapted table when the source identity is
//! unchanged and recomputes everything downstream. Errors never escape:
//! they are turned into a [`Screen`] the host can show.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};
use polars::prelude::*;

use crate::adapter::{self, ColumnPresence};
use crate::aggregation::{aggregate, Kpis};
use crate::engine;
use crate::error::DashboardError;
use crate::filters::{sidebar, FilterOptions, FilterState, SidebarSection};
use crate::predicate::build_predicates;
use crate::source::{self, RawSource, SourceKey, Upload};
use crate::visualization::{build_views, ChartSpec};

/// Controller settings.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// File checked on every event when no upload is present.
    pub default_source: PathBuf,
    /// Banner lines above the header row.
    pub banner_rows: usize,
    /// Rows of the filtered view included in the preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_source: PathBuf::from("data/hr_attrition.csv"),
            banner_rows: 1,
            preview_rows: 100,
        }
    }
}

/// Adapted reference table with everything derived from it once per source.
#[derive(Debug)]
pub struct Dataset {
    pub table: DataFrame,
    pub presence: ColumnPresence,
    pub options: FilterOptions,
    pub sidebar: Vec<SidebarSection>,
}

impl Dataset {
    pub fn from_bytes(bytes: &[u8], banner_rows: usize) -> Result<Self, DashboardError> {
        let adapted = adapter::load(bytes, banner_rows)?;
        let options = FilterOptions::from_table(&adapted.table, &adapted.presence)?;
        let sidebar = sidebar(&adapted.presence);
        Ok(Self {
            table: adapted.table,
            presence: adapted.presence,
            options,
            sidebar,
        })
    }
}

/// Everything the host displays after one pipeline run.
#[derive(Debug, Clone)]
pub struct Report {
    pub kpis: Kpis,
    pub charts: Vec<ChartSpec>,
    pub filtered: DataFrame,
    pub preview: DataFrame,
}

/// Run the filter → aggregate → view pipeline over a loaded dataset.
pub fn run_pipeline(
    dataset: &Dataset,
    state: &FilterState,
    preview_rows: usize,
) -> Result<Report, DashboardError> {
    let predicates = build_predicates(state, &dataset.presence, &dataset.options);
    let filtered = engine::apply(&dataset.table, &predicates)?;
    let (kpis, chart_data) = aggregate(&filtered, &dataset.presence)?;
    let charts = build_views(&chart_data);
    let preview = filtered.head(Some(preview_rows));
    debug!(
        "event=pipeline module=controller predicates={} rows={} charts={}",
        predicates.len(),
        kpis.total,
        charts.len()
    );
    Ok(Report {
        kpis,
        charts,
        filtered,
        preview,
    })
}

/// Widget values and uploads, as seen by the UI host at event time.
pub trait UiHost {
    /// Currently uploaded file, if any.
    fn upload(&self) -> Option<Upload>;

    /// Snapshot of every sidebar widget.
    fn filter_state(&self) -> FilterState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingData,
    Ready,
}

/// What the host should render for an event.
#[derive(Debug, Clone)]
pub enum Screen {
    /// No data yet; show the warning and the upload widget.
    AwaitingData { warning: String },
    /// Loading failed; show the message and stop.
    Failed { message: String },
    /// Dashboard content, plus the dataset for rendering the sidebar.
    Ready {
        dataset: Arc<Dataset>,
        report: Box<Report>,
    },
}

pub struct Dashboard {
    config: DashboardConfig,
    state: SessionState,
    cached: Option<(SourceKey, Arc<Dataset>)>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            state: SessionState::AwaitingData,
            cached: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Dataset of the current source, if one has been loaded.
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.cached.as_ref().map(|(_, d)| Arc::clone(d))
    }

    /// Handle one user interaction.
    pub fn on_event<H: UiHost + ?Sized>(&mut self, host: &H) -> Screen {
        let filters = host.filter_state();
        let upload = host.upload();

        match self.evaluate(upload, &filters) {
            Ok((dataset, report)) => {
                self.state = SessionState::Ready;
                Screen::Ready {
                    dataset,
                    report: Box::new(report),
                }
            }
            Err(DashboardError::SourceMissing(path)) => {
                self.state = SessionState::AwaitingData;
                Screen::AwaitingData {
                    warning: format!(
                        "Default dataset '{path}' was not found. Upload a CSV file to continue."
                    ),
                }
            }
            Err(err) => {
                warn!("event=pipeline module=controller status=failed error={err}");
                self.state = SessionState::AwaitingData;
                Screen::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    fn evaluate(
        &mut self,
        upload: Option<Upload>,
        filters: &FilterState,
    ) -> Result<(Arc<Dataset>, Report), DashboardError> {
        let dataset = self.resolve(upload)?;
        let report = run_pipeline(&dataset, filters, self.config.preview_rows)?;
        Ok((dataset, report))
    }

    /// Adapted dataset for the current source. An upload overrides the
    /// default file. Adaptation is skipped when the source identity matches
    /// the cached one.
    fn resolve(&mut self, upload: Option<Upload>) -> Result<Arc<Dataset>, DashboardError> {
        let raw = match upload {
            Some(upload) => RawSource::from_upload(upload),
            None => {
                let key = source::stat_file(&self.config.default_source)?;
                if let Some(hit) = self.cache_hit(&key) {
                    return Ok(hit);
                }
                source::read_file(&key)?
            }
        };

        if let Some(hit) = self.cache_hit(&raw.key) {
            return Ok(hit);
        }

        self.cached = None;
        let dataset = Arc::new(Dataset::from_bytes(&raw.bytes, self.config.banner_rows)?);
        info!(
            "event=schema_cache module=controller status=miss rows={}",
            dataset.table.height()
        );
        self.cached = Some((raw.key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    fn cache_hit(&self, key: &SourceKey) -> Option<Arc<Dataset>> {
        match &self.cached {
            Some((cached_key, dataset)) if cached_key == key => {
                debug!("event=schema_cache module=controller status=hit");
                Some(Arc::clone(dataset))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "HR export\n部門,離職,月薪\nSales,是,3000\nR&D,否,5000\n";

    #[test]
    fn pipeline_over_dataset() {
        let dataset = Dataset::from_bytes(CSV.as_bytes(), 1).unwrap();
        let report = run_pipeline(&dataset, &FilterState::default(), 1).unwrap();
        assert_eq!(report.kpis.total, 2);
        assert_eq!(report.kpis.left_count, 1);
        // Department chart plus the salary box plot.
        assert_eq!(report.charts.len(), 2);
        assert_eq!(report.preview.height(), 1);
        assert_eq!(report.filtered.height(), 2);
    }

    #[test]
    fn dataset_carries_options_and_sidebar() {
        let dataset = Dataset::from_bytes(CSV.as_bytes(), 1).unwrap();
        assert_eq!(dataset.options.departments, vec!["R&D", "Sales"]);
        assert_eq!(dataset.options.salary.map(|r| (r.lo, r.hi)), Some((3000, 5000)));
        assert_eq!(dataset.sidebar.len(), 2);
    }

    #[test]
    fn widest_widgets_emit_no_predicates() {
        let dataset = Dataset::from_bytes(CSV.as_bytes(), 1).unwrap();
        let state = FilterState::admit_all(&dataset.options);
        let predicates = build_predicates(&state, &dataset.presence, &dataset.options);
        assert!(predicates.is_empty());

        let view = engine::apply(&dataset.table, &predicates).unwrap();
        assert!(view.equals_missing(&dataset.table));
    }
}
