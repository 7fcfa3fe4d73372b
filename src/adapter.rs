//! Schema adapter: maps source headers and cell values onto the canonical
//! employee vocabulary and records which attributes the source provides.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use polars::prelude::*;

use crate::error::DashboardError;
use crate::schema::{flag, gender, Attribute, ValueKind};
use crate::source::read_csv_as_strings;

/// Set of canonical attributes found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPresence(BTreeSet<Attribute>);

impl ColumnPresence {
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.0.contains(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn missing_required(&self) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|a| a.is_required() && !self.contains(*a))
            .collect()
    }
}

impl FromIterator<Attribute> for ColumnPresence {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Canonical reference table and the attributes it carries.
#[derive(Debug, Clone)]
pub struct AdaptedTable {
    pub table: DataFrame,
    pub presence: ColumnPresence,
}

/// Parse CSV bytes and adapt them.
///
/// The first `banner_rows` lines are expected to be a banner. When the
/// required columns cannot be found below the banner, the bytes are retried
/// as a plain CSV whose first line is the header; if that also fails the
/// first schema error is returned.
pub fn load(bytes: &[u8], banner_rows: usize) -> Result<AdaptedTable, DashboardError> {
    let first = read_csv_as_strings(bytes, banner_rows).and_then(adapt);
    match first {
        Err(schema_err @ DashboardError::Schema { .. }) if banner_rows > 0 => {
            debug!("event=adapt module=adapter status=retry banner_rows=0");
            match read_csv_as_strings(bytes, 0).and_then(adapt) {
                Ok(adapted) => {
                    info!("event=adapt module=adapter status=ok banner=absent");
                    Ok(adapted)
                }
                Err(_) => Err(schema_err),
            }
        }
        other => other,
    }
}

/// Rename source headers to canonical names, normalize cell values and
/// check that the required attributes are present.
pub fn adapt(raw: DataFrame) -> Result<AdaptedTable, DashboardError> {
    let headers: Vec<String> = raw
        .get_column_names_str()
        .iter()
        .map(|c| c.to_string())
        .collect();

    let mut old_names: Vec<String> = Vec::new();
    let mut new_names: Vec<&str> = Vec::new();
    let mut found: BTreeSet<Attribute> = BTreeSet::new();

    for attribute in Attribute::ALL {
        let Some(header) = resolve_header(&headers, attribute) else {
            continue;
        };
        found.insert(attribute);
        if header != attribute.name() {
            old_names.push(header.to_string());
            new_names.push(attribute.name());
        }
    }

    for header in &headers {
        let shadowed = Attribute::ALL
            .into_iter()
            .any(|a| a.matches_header(header) && !old_names.contains(header) && header != a.name());
        if shadowed {
            warn!(
                "event=adapt module=adapter status=ignored header={} reason=duplicate_alias",
                header
            );
        }
    }

    let presence = ColumnPresence(found);
    let missing = presence.missing_required();
    if !missing.is_empty() {
        return Err(DashboardError::Schema {
            missing: missing.iter().map(|a| a.name().to_string()).collect(),
        });
    }

    let normalized: Vec<Expr> = presence.iter().map(normalize_expr).collect();
    let table = raw
        .lazy()
        .rename(old_names, new_names, true)
        .with_columns(normalized)
        .collect()?;

    info!(
        "event=adapt module=adapter status=ok rows={} columns={}",
        table.height(),
        presence.len()
    );
    Ok(AdaptedTable { table, presence })
}

/// Header that supplies `attribute`: the canonical name if present,
/// otherwise the first alias in priority order.
fn resolve_header<'a>(headers: &'a [String], attribute: Attribute) -> Option<&'a str> {
    if let Some(exact) = headers.iter().find(|h| h.as_str() == attribute.name()) {
        return Some(exact.as_str());
    }
    std::iter::once(attribute.name())
        .chain(attribute.aliases().iter().copied())
        .find_map(|candidate| {
            headers
                .iter()
                .find(|h| h.eq_ignore_ascii_case(candidate))
                .map(|h| h.as_str())
        })
}

fn normalize_expr(attribute: Attribute) -> Expr {
    let name = attribute.name();
    let trimmed = col(name).str().strip_chars(lit(" \t\r\n"));
    match attribute.kind() {
        ValueKind::Label => trimmed.alias(name),
        ValueKind::Integer => trimmed
            .cast(DataType::Float64)
            .cast(DataType::Int64)
            .alias(name),
        ValueKind::Flag => relabel(
            trimmed.str().to_lowercase(),
            &[
                (flag::YES, &flag::YES_SYNONYMS),
                (flag::NO, &flag::NO_SYNONYMS),
            ],
        )
        .alias(name),
        ValueKind::Sex => relabel(
            trimmed.str().to_lowercase(),
            &[
                (gender::MALE, &gender::MALE_SYNONYMS),
                (gender::FEMALE, &gender::FEMALE_SYNONYMS),
            ],
        )
        .alias(name),
    }
}

/// Map each synonym group onto its canonical label; unknown values pass through.
fn relabel(value: Expr, groups: &[(&str, &[&str])]) -> Expr {
    groups
        .iter()
        .rev()
        .fold(value.clone(), |otherwise, (label, synonyms)| {
            let set = Series::new(PlSmallStr::EMPTY, synonyms.to_vec());
            when(value.clone().is_in(lit(set), false))
                .then(lit(*label))
                .otherwise(otherwise)
        })
}
