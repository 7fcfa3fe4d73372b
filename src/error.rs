use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Data source not found: {0}")]
    SourceMissing(String),

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Could not read CSV: {0}")]
    Parse(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("No dataset loaded")]
    NotLoaded,

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Fatal errors halt the session; everything else degrades gracefully.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DashboardError::SourceMissing(_))
    }
}

#[cfg(feature = "python")]
impl From<DashboardError> for pyo3::PyErr {
    fn from(err: DashboardError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}
