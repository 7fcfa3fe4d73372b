//! Raw CSV sources: the default file on disk or a user upload.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{info, warn};
use polars::prelude::*;

use crate::error::DashboardError;

/// A file handed over by the UI host's upload widget.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Identity of a source, used as the cache key for adapted tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    File {
        path: PathBuf,
        len: u64,
        modified: Option<SystemTime>,
    },
    Upload {
        name: String,
        len: u64,
        digest: u64,
    },
}

/// Raw bytes plus the identity they were read under.
#[derive(Debug, Clone)]
pub struct RawSource {
    pub key: SourceKey,
    pub bytes: Vec<u8>,
}

impl RawSource {
    pub fn from_upload(upload: Upload) -> Self {
        let mut hasher = DefaultHasher::new();
        upload.bytes.hash(&mut hasher);
        Self {
            key: SourceKey::Upload {
                name: upload.name,
                len: upload.bytes.len() as u64,
                digest: hasher.finish(),
            },
            bytes: upload.bytes,
        }
    }
}

/// Identity of the file at `path`, or `SourceMissing` when it does not exist.
pub fn stat_file(path: &Path) -> Result<SourceKey, DashboardError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(SourceKey::File {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        }),
        Ok(_) => Err(DashboardError::SourceMissing(path.display().to_string())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                "event=source_stat module=source status=missing path={}",
                path.display()
            );
            Err(DashboardError::SourceMissing(path.display().to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Read the whole file behind `key`. Only `SourceKey::File` is readable from disk.
pub fn read_file(key: &SourceKey) -> Result<RawSource, DashboardError> {
    let SourceKey::File { path, .. } = key else {
        return Err(DashboardError::NotLoaded);
    };
    let bytes = std::fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => DashboardError::SourceMissing(path.display().to_string()),
        _ => DashboardError::Io(err),
    })?;
    info!(
        "event=source_read module=source status=ok path={} bytes={}",
        path.display(),
        bytes.len()
    );
    Ok(RawSource {
        key: key.clone(),
        bytes,
    })
}

/// Parse CSV bytes into a DataFrame with every column as String.
///
/// `skip_rows` lines are dropped before the header line. Header names are
/// trimmed. Any reader failure is reported as `DashboardError::Parse`.
pub fn read_csv_as_strings(bytes: &[u8], skip_rows: usize) -> Result<DataFrame, DashboardError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(Some(0)) // all columns as String
        .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| DashboardError::Parse(e.to_string()))?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())
        .map_err(|e| DashboardError::Parse(e.to_string()))?;

    Ok(df)
}
