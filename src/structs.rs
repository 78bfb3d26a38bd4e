//! Consolidated public types for the rentstat crate
//!
//! This module contains the record model, category enums, aggregation rows and
//! report types used across the crate. Behaviour lives next to the code that
//! needs it, under `analysis/`.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use crate::csv_reader::CsvData;
pub use crate::error::{RentalError, Result};

// ============================================================================
// Category Types
// ============================================================================

/// Two-valued day classification
///
/// Variant order is the display order: non-working days sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayType {
    NonWorking,
    Working,
}

impl DayType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NonWorking => "non-working",
            Self::Working => "working",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DayType {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Weather condition, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weather {
    Clear,
    Mist,
    LightPrecipitation,
    HeavyPrecipitation,
}

impl Weather {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Mist => "mist",
            Self::LightPrecipitation => "light-precipitation",
            Self::HeavyPrecipitation => "heavy-precipitation",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which rule derives the day-type of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierMode {
    /// Saturday and Sunday are non-working; holidays are not consulted
    WeekdayName,
    /// The working-day flag decides
    #[default]
    Flag,
}

impl FromStr for ClassifierMode {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekday-name" | "weekday" => Ok(Self::WeekdayName),
            "flag" | "working-day" => Ok(Self::Flag),
            other => Err(RentalError::InvalidInput(format!(
                "unknown classifier '{other}' (expected 'flag' or 'weekday-name')"
            ))),
        }
    }
}

/// How the dataset spells weekdays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayLocale {
    #[default]
    Id,
    En,
    /// `0` is Sunday through `6` Saturday
    Numeric,
}

/// Raw values accepted as true/false in boolean-like columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagEncoding {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
}

// ============================================================================
// Record Types
// ============================================================================

/// One typed row of the rental dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalRecord {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub season: Season,
    pub year: i32,
    pub month: u32,
    pub holiday: bool,
    pub working_day: bool,
    pub weather: Weather,
    /// Degrees Celsius
    pub temperature: f64,
    pub count: u32,
    pub day_type: DayType,
}

// ============================================================================
// Aggregation Types
// ============================================================================

/// Reduction applied to the target column of each group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

/// Which keys appear in a grouped result, and in what order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOrder<K> {
    /// Keys actually present, ascending
    Natural,
    /// Exactly these keys in this order, zero-filled when absent
    Reindex(Vec<K>),
}

/// One row of a grouped result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow<K> {
    pub key: K,
    /// Number of records that fell into this group
    pub records: usize,
    pub value: f64,
    /// Share of the sum of `value` over all rows of the same result
    pub percentage: f64,
}

/// Pearson coefficient, or undefined when either series has no variance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Positive,
    Negative,
    None,
}

// ============================================================================
// Filter Types
// ============================================================================

/// Set-membership selection; `Only` with an empty set selects nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

/// Closed date interval, inclusive at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub date_range: Option<DateRange>,
    pub years: Selection<i32>,
    pub seasons: Selection<Season>,
    pub day_types: Selection<DayType>,
}

/// How a filtered record set came about, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "fields", rename_all = "snake_case")]
pub enum SelectionState {
    /// No filter was applied; the full dataset
    Unfiltered,
    Filtered,
    /// The user deselected every category of these fields
    NothingSelected(Vec<String>),
}

/// Records surviving a filter, in original order
#[derive(Debug, Clone)]
pub struct FilteredRecords<'a> {
    pub records: Vec<&'a RentalRecord>,
    pub state: SelectionState,
}

// ============================================================================
// Report Types
// ============================================================================

/// A temperature/count pair for scatter plotting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub date: NaiveDate,
    pub temperature: f64,
    pub count: u32,
}

/// Correlation between temperature and rentals, with its reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationSummary {
    pub coefficient: Correlation,
    pub relationship: Relationship,
}

/// Everything one analysis run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport<'a> {
    pub state: SelectionState,
    pub total_records: usize,
    /// Records that passed the filter, in original order
    pub selected: Vec<&'a RentalRecord>,
    pub day_types: Vec<AggregateRow<DayType>>,
    pub seasons: Vec<AggregateRow<Season>>,
    pub weather: Vec<AggregateRow<Weather>>,
    pub correlation: CorrelationSummary,
    pub scatter: Vec<ScatterPoint>,
}
