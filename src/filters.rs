//! Filter state captured from the sidebar widgets, widget options derived
//! from the reference table, and the sidebar layout.

use std::collections::BTreeSet;
use std::str::FromStr;

use polars::prelude::*;

use crate::adapter::ColumnPresence;
use crate::error::DashboardError;
use crate::schema::{flag, gender, Attribute, SATISFACTION_SCALE};

/// Identifier of a sidebar filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterId {
    Dept,
    Role,
    Overtime,
    Travel,
    Satisfaction,
    Salary,
    Age,
    Gender,
}

/// Value shape a filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    Members,
    Choice,
    Range,
}

impl FilterId {
    pub const ALL: [FilterId; 8] = [
        FilterId::Dept,
        FilterId::Role,
        FilterId::Overtime,
        FilterId::Travel,
        FilterId::Satisfaction,
        FilterId::Salary,
        FilterId::Age,
        FilterId::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterId::Dept => "dept",
            FilterId::Role => "role",
            FilterId::Overtime => "overtime",
            FilterId::Travel => "travel",
            FilterId::Satisfaction => "satisfaction",
            FilterId::Salary => "salary",
            FilterId::Age => "age",
            FilterId::Gender => "gender",
        }
    }

    /// Column the filter reads.
    pub fn attribute(self) -> Attribute {
        match self {
            FilterId::Dept => Attribute::Department,
            FilterId::Role => Attribute::JobRole,
            FilterId::Overtime => Attribute::Overtime,
            FilterId::Travel => Attribute::TravelFrequency,
            FilterId::Satisfaction => Attribute::JobSatisfaction,
            FilterId::Salary => Attribute::MonthlySalary,
            FilterId::Age => Attribute::Age,
            FilterId::Gender => Attribute::Gender,
        }
    }

    pub fn shape(self) -> FilterShape {
        match self {
            FilterId::Dept | FilterId::Role | FilterId::Travel => FilterShape::Members,
            FilterId::Overtime | FilterId::Gender => FilterShape::Choice,
            FilterId::Satisfaction | FilterId::Salary | FilterId::Age => FilterShape::Range,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterId::Dept => "Department",
            FilterId::Role => "Job role",
            FilterId::Overtime => "Overtime",
            FilterId::Travel => "Business travel",
            FilterId::Satisfaction => "Job satisfaction",
            FilterId::Salary => "Monthly salary",
            FilterId::Age => "Age",
            FilterId::Gender => "Gender",
        }
    }

    pub fn section(self) -> Section {
        match self {
            FilterId::Dept | FilterId::Role => Section::Organization,
            FilterId::Overtime | FilterId::Travel => Section::Workload,
            FilterId::Satisfaction => Section::Satisfaction,
            FilterId::Salary => Section::Salary,
            FilterId::Age | FilterId::Gender => Section::PersonalBackground,
        }
    }
}

impl FromStr for FilterId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DashboardError::InvalidFilter(format!("unknown filter id '{s}'")))
    }
}

impl std::fmt::Display for FilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-select widget value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }
}

/// Tri-state radio value: "all" or one specific label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Parse a radio label; "all" (any case) admits everything.
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value == flag::ALL {
            Choice::All
        } else {
            Choice::Only(value)
        }
    }
}

/// Inclusive slider range. Endpoints are kept as given; `lo > hi` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub lo: i64,
    pub hi: i64,
}

impl SliderRange {
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn covers(&self, domain: SliderRange) -> bool {
        self.lo <= domain.lo && self.hi >= domain.hi
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// A single filter value as delivered by a host that speaks in filter ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    All,
    AnyOf(Vec<String>),
    Choice(String),
    Between(i64, i64),
}

/// Snapshot of every sidebar widget. `Default` admits all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub dept: Selection,
    pub role: Selection,
    pub overtime: Choice,
    pub travel: Selection,
    pub satisfaction: Option<SliderRange>,
    pub salary: Option<SliderRange>,
    pub age: Option<SliderRange>,
    pub gender: Choice,
}

impl FilterState {
    /// State with every widget set explicitly to its widest value.
    pub(crate) fn admit_all(options: &FilterOptions) -> Self {
        Self {
            dept: Selection::only(options.departments.clone()),
            role: options
                .roles
                .clone()
                .map(Selection::only)
                .unwrap_or_default(),
            overtime: Choice::All,
            travel: options
                .travel
                .clone()
                .map(Selection::only)
                .unwrap_or_default(),
            satisfaction: options.satisfaction,
            salary: options.salary,
            age: options.age,
            gender: Choice::All,
        }
    }

    /// Set one filter by id, rejecting values whose shape does not fit the id.
    pub fn set(&mut self, id: FilterId, value: FilterValue) -> Result<(), DashboardError> {
        let mismatch = |value: &FilterValue| {
            DashboardError::InvalidFilter(format!(
                "filter '{id}' expects {:?}, got {value:?}",
                id.shape()
            ))
        };

        match (id.shape(), value) {
            (FilterShape::Members, FilterValue::All) => *self.selection_mut(id) = Selection::All,
            (FilterShape::Members, FilterValue::AnyOf(values)) => {
                *self.selection_mut(id) = Selection::only(values)
            }
            (FilterShape::Choice, FilterValue::All) => *self.choice_mut(id) = Choice::All,
            (FilterShape::Choice, FilterValue::Choice(value)) => {
                *self.choice_mut(id) = Choice::parse(&value)
            }
            (FilterShape::Range, FilterValue::All) => *self.range_mut(id) = None,
            (FilterShape::Range, FilterValue::Between(lo, hi)) => {
                if id == FilterId::Satisfaction {
                    let (min, max) = SATISFACTION_SCALE;
                    if !(min <= lo && lo <= hi && hi <= max) {
                        return Err(DashboardError::InvalidFilter(format!(
                            "filter '{id}' expects {min} <= lo <= hi <= {max}, got ({lo}, {hi})"
                        )));
                    }
                }
                *self.range_mut(id) = Some(SliderRange::new(lo, hi))
            }
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }

    fn selection_mut(&mut self, id: FilterId) -> &mut Selection {
        match id {
            FilterId::Role => &mut self.role,
            FilterId::Travel => &mut self.travel,
            _ => &mut self.dept,
        }
    }

    fn choice_mut(&mut self, id: FilterId) -> &mut Choice {
        match id {
            FilterId::Gender => &mut self.gender,
            _ => &mut self.overtime,
        }
    }

    fn range_mut(&mut self, id: FilterId) -> &mut Option<SliderRange> {
        match id {
            FilterId::Satisfaction => &mut self.satisfaction,
            FilterId::Age => &mut self.age,
            _ => &mut self.salary,
        }
    }
}

/// Widget options derived once from the reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub roles: Option<Vec<String>>,
    pub overtime: Option<Vec<String>>,
    pub travel: Option<Vec<String>>,
    pub satisfaction: Option<SliderRange>,
    pub salary: Option<SliderRange>,
    pub age: Option<SliderRange>,
    pub gender: Option<Vec<String>>,
}

impl FilterOptions {
    pub fn from_table(table: &DataFrame, presence: &ColumnPresence) -> Result<Self, DashboardError> {
        let labels = |attribute: Attribute| -> Result<Option<Vec<String>>, DashboardError> {
            if presence.contains(attribute) {
                distinct_labels(table, attribute).map(Some)
            } else {
                Ok(None)
            }
        };
        let domain = |attribute: Attribute| -> Result<Option<SliderRange>, DashboardError> {
            if presence.contains(attribute) {
                value_domain(table, attribute)
            } else {
                Ok(None)
            }
        };

        Ok(Self {
            departments: labels(Attribute::Department)?.unwrap_or_default(),
            roles: labels(Attribute::JobRole)?,
            overtime: presence
                .contains(Attribute::Overtime)
                .then(|| vec![flag::YES.to_string(), flag::NO.to_string()]),
            travel: labels(Attribute::TravelFrequency)?,
            satisfaction: presence
                .contains(Attribute::JobSatisfaction)
                .then(|| SliderRange::new(SATISFACTION_SCALE.0, SATISFACTION_SCALE.1)),
            salary: domain(Attribute::MonthlySalary)?,
            age: domain(Attribute::Age)?,
            gender: presence
                .contains(Attribute::Gender)
                .then(|| vec![gender::MALE.to_string(), gender::FEMALE.to_string()]),
        })
    }

    /// Every distinct label the multi-select for `id` offers.
    pub fn labels(&self, id: FilterId) -> Option<&[String]> {
        match id {
            FilterId::Dept => Some(self.departments.as_slice()),
            FilterId::Role => self.roles.as_deref(),
            FilterId::Overtime => self.overtime.as_deref(),
            FilterId::Travel => self.travel.as_deref(),
            FilterId::Gender => self.gender.as_deref(),
            _ => None,
        }
    }

    /// Slider domain for a range filter.
    pub fn domain(&self, id: FilterId) -> Option<SliderRange> {
        match id {
            FilterId::Satisfaction => self.satisfaction,
            FilterId::Salary => self.salary,
            FilterId::Age => self.age,
            _ => None,
        }
    }
}

fn distinct_labels(table: &DataFrame, attribute: Attribute) -> Result<Vec<String>, DashboardError> {
    let unique = table
        .column(attribute.name())?
        .as_materialized_series()
        .unique()?;
    let mut labels: Vec<String> = unique
        .str()?
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect();
    labels.sort();
    Ok(labels)
}

fn value_domain(table: &DataFrame, attribute: Attribute) -> Result<Option<SliderRange>, DashboardError> {
    let s = table.column(attribute.name())?.as_materialized_series();
    let min = s.min_reduce()?.value().try_extract::<i64>().ok();
    let max = s.max_reduce()?.value().try_extract::<i64>().ok();
    Ok(match (min, max) {
        (Some(lo), Some(hi)) => Some(SliderRange::new(lo, hi)),
        _ => None,
    })
}

/// Collapsible sidebar group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Organization,
    Workload,
    Satisfaction,
    Salary,
    PersonalBackground,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Organization,
        Section::Workload,
        Section::Satisfaction,
        Section::Salary,
        Section::PersonalBackground,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Organization => "Organization",
            Section::Workload => "Workload",
            Section::Satisfaction => "Satisfaction",
            Section::Salary => "Salary",
            Section::PersonalBackground => "Personal Background",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarSection {
    pub section: Section,
    pub filters: Vec<FilterId>,
}

/// Sidebar sections in display order, holding only filters whose column exists.
pub fn sidebar(presence: &ColumnPresence) -> Vec<SidebarSection> {
    Section::ALL
        .into_iter()
        .filter_map(|section| {
            let filters: Vec<FilterId> = FilterId::ALL
                .into_iter()
                .filter(|id| id.section() == section && presence.contains(id.attribute()))
                .collect();
            (!filters.is_empty()).then_some(SidebarSection { section, filters })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataFrame {
        df!(
            "department" => ["Sales", "R&D", "Sales", "HR"],
            "attrition" => ["yes", "no", "no", "no"],
            "monthly_salary" => [3000i64, 5200, 4100, 6100],
            "age" => [Some(25i64), None, Some(41), Some(33)],
        )
        .unwrap()
    }

    fn presence() -> ColumnPresence {
        [
            Attribute::Department,
            Attribute::Attrition,
            Attribute::MonthlySalary,
            Attribute::Age,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn options_come_from_the_table() {
        let options = FilterOptions::from_table(&table(), &presence()).unwrap();
        assert_eq!(options.departments, vec!["HR", "R&D", "Sales"]);
        assert_eq!(options.salary, Some(SliderRange::new(3000, 6100)));
        assert_eq!(options.age, Some(SliderRange::new(25, 41)));
        assert_eq!(options.roles, None);
        assert_eq!(options.satisfaction, None);
    }

    #[test]
    fn ids_parse_and_shapes_are_enforced() {
        let mut state = FilterState::default();
        state
            .set("salary".parse().unwrap(), FilterValue::Between(9000, 1000))
            .unwrap();
        assert_eq!(state.salary, Some(SliderRange { lo: 9000, hi: 1000 }));
        assert!(!state.salary.unwrap().contains(5000));

        state
            .set(FilterId::Overtime, FilterValue::Choice("Yes".into()))
            .unwrap();
        assert_eq!(state.overtime, Choice::Only("yes".into()));

        let err = state
            .set(FilterId::Dept, FilterValue::Between(1, 2))
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidFilter(_)));
        assert!("bonus".parse::<FilterId>().is_err());
    }

    #[test]
    fn satisfaction_must_stay_on_the_scale() {
        let mut state = FilterState::default();
        for (lo, hi) in [(0, 3), (2, 5), (4, 2)] {
            let err = state
                .set(FilterId::Satisfaction, FilterValue::Between(lo, hi))
                .unwrap_err();
            assert!(matches!(err, DashboardError::InvalidFilter(_)), "({lo}, {hi})");
        }
        assert_eq!(state.satisfaction, None);

        state
            .set(FilterId::Satisfaction, FilterValue::Between(2, 3))
            .unwrap();
        assert_eq!(state.satisfaction, Some(SliderRange::new(2, 3)));

        // Salary and age sliders accept any pair, inverted ones included.
        state
            .set(FilterId::Age, FilterValue::Between(40, 20))
            .unwrap();
        assert_eq!(state.age, Some(SliderRange { lo: 40, hi: 20 }));
    }

    #[test]
    fn sidebar_skips_absent_columns() {
        let layout = sidebar(&presence());
        let sections: Vec<_> = layout.iter().map(|s| s.section).collect();
        assert_eq!(
            sections,
            vec![
                Section::Organization,
                Section::Salary,
                Section::PersonalBackground
            ]
        );
        assert_eq!(layout[0].filters, vec![FilterId::Dept]);
        assert_eq!(layout[2].filters, vec![FilterId::Age]);
    }
}
