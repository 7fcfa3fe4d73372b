//! Row predicates built from a filter snapshot.

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::adapter::ColumnPresence;
use crate::filters::{Choice, FilterId, FilterOptions, FilterState, Selection, SliderRange};
use crate::schema::Attribute;

/// A single row test. Predicates are independent and combine by conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Cell is one of the listed labels.
    MemberOf {
        attribute: Attribute,
        values: BTreeSet<String>,
    },
    /// Cell equals the label.
    Equals { attribute: Attribute, value: String },
    /// `lo <= cell <= hi`.
    Between {
        attribute: Attribute,
        range: SliderRange,
    },
}

impl Predicate {
    pub fn attribute(&self) -> Attribute {
        match self {
            Predicate::MemberOf { attribute, .. }
            | Predicate::Equals { attribute, .. }
            | Predicate::Between { attribute, .. } => *attribute,
        }
    }

    /// Lower to a boolean expression. Null cells never match.
    pub fn to_expr(&self) -> Expr {
        let column = col(self.attribute().name());
        match self {
            Predicate::MemberOf { values, .. } => {
                let set = Series::new(
                    PlSmallStr::EMPTY,
                    values.iter().map(String::as_str).collect::<Vec<_>>(),
                );
                column.is_in(lit(set), false).fill_null(lit(false))
            }
            Predicate::Equals { value, .. } => column.eq(lit(value.as_str())).fill_null(lit(false)),
            Predicate::Between { range, .. } => column
                .clone()
                .gt_eq(lit(range.lo))
                .and(column.lt_eq(lit(range.hi)))
                .fill_null(lit(false)),
        }
    }
}

/// Predicates for every filter that restricts rows.
///
/// Filters whose column is absent are skipped. "All" choices, selections that
/// include every available label and ranges that cover the whole slider
/// domain produce no predicate.
pub fn build_predicates(
    state: &FilterState,
    presence: &ColumnPresence,
    options: &FilterOptions,
) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    for id in FilterId::ALL {
        let attribute = id.attribute();
        if !presence.contains(attribute) {
            continue;
        }
        let predicate = match id {
            FilterId::Dept => member_of(attribute, &state.dept, options.labels(id)),
            FilterId::Role => member_of(attribute, &state.role, options.labels(id)),
            FilterId::Travel => member_of(attribute, &state.travel, options.labels(id)),
            FilterId::Overtime => equals(attribute, &state.overtime),
            FilterId::Gender => equals(attribute, &state.gender),
            FilterId::Satisfaction => between(attribute, state.satisfaction, options.domain(id)),
            FilterId::Salary => between(attribute, state.salary, options.domain(id)),
            FilterId::Age => between(attribute, state.age, options.domain(id)),
        };
        predicates.extend(predicate);
    }

    predicates
}

fn member_of(
    attribute: Attribute,
    selection: &Selection,
    available: Option<&[String]>,
) -> Option<Predicate> {
    let Selection::Only(values) = selection else {
        return None;
    };
    let covers_all = available.is_some_and(|labels| labels.iter().all(|l| values.contains(l)));
    (!covers_all).then(|| Predicate::MemberOf {
        attribute,
        values: values.clone(),
    })
}

fn equals(attribute: Attribute, choice: &Choice) -> Option<Predicate> {
    match choice {
        Choice::All => None,
        Choice::Only(value) => Some(Predicate::Equals {
            attribute,
            value: value.clone(),
        }),
    }
}

fn between(
    attribute: Attribute,
    range: Option<SliderRange>,
    domain: Option<SliderRange>,
) -> Option<Predicate> {
    let range = range?;
    if domain.is_some_and(|d| range.covers(d)) {
        return None;
    }
    Some(Predicate::Between { attribute, range })
}
