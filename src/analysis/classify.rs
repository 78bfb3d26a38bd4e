//! Day-type classification from weekday names or the working-day flag

use crate::structs::{DayType, FlagEncoding, RentalError, Result, WeekdayLocale};
use chrono::Weekday;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const INDONESIAN: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
const ENGLISH: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const NUMERIC: [&str; 7] = ["1", "2", "3", "4", "5", "6", "0"];

/// Weekday spellings of one locale, Monday first
#[derive(Debug, Clone, Copy)]
pub struct DayNames {
    names: &'static [&'static str; 7],
}

impl DayNames {
    #[must_use]
    pub fn for_locale(locale: WeekdayLocale) -> Self {
        let names = match locale {
            WeekdayLocale::Id => &INDONESIAN,
            WeekdayLocale::En => &ENGLISH,
            WeekdayLocale::Numeric => &NUMERIC,
        };
        Self { names }
    }

    /// Resolve a weekday name (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the value if it is not one of the seven spellings
    pub fn weekday(&self, raw: &str) -> Result<Weekday> {
        let name = raw.trim();
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| WEEK[i])
            .ok_or_else(|| {
                RentalError::InvalidInput(format!(
                    "unrecognized weekday '{raw}' (expected one of {})",
                    self.names.join(", ")
                ))
            })
    }
}

impl DayType {
    /// Saturday and Sunday are non-working, every other day is working
    #[must_use]
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat | Weekday::Sun => Self::NonWorking,
            _ => Self::Working,
        }
    }

    #[must_use]
    pub fn from_flag(working_day: bool) -> Self {
        if working_day {
            Self::Working
        } else {
            Self::NonWorking
        }
    }

    /// Parse a day-type label as used in config files and on the command line
    ///
    /// # Errors
    /// Returns `InvalidInput` for anything but a known label
    pub fn from_label(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "working" | "hari kerja" => Ok(Self::Working),
            "non-working" | "nonworking" | "akhir pekan/libur" => Ok(Self::NonWorking),
            _ => Err(RentalError::InvalidInput(format!(
                "unknown day-type '{raw}' (expected 'working' or 'non-working')"
            ))),
        }
    }
}

impl FlagEncoding {
    /// Decode a boolean-like cell
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the value if it is in neither set
    pub fn parse_flag(&self, raw: &str) -> Result<bool> {
        let value = raw.trim();
        if self.truthy.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            Ok(true)
        } else if self.falsy.iter().any(|f| f.eq_ignore_ascii_case(value)) {
            Ok(false)
        } else {
            Err(RentalError::InvalidInput(format!(
                "'{raw}' is not a recognized flag value (true: {}; false: {})",
                self.truthy.join("/"),
                self.falsy.join("/")
            )))
        }
    }
}

/// Weekday-name rule. A holiday falling on a weekday still counts as working.
///
/// # Errors
/// Returns `InvalidInput` if the name is not a weekday of the locale
pub fn classify_weekday_name(raw: &str, names: &DayNames) -> Result<DayType> {
    names.weekday(raw).map(DayType::from_weekday)
}

/// Working-day flag rule
///
/// # Errors
/// Returns `InvalidInput` if the flag is neither truthy nor falsy
pub fn classify_flag(raw: &str, encoding: &FlagEncoding) -> Result<DayType> {
    encoding.parse_flag(raw).map(DayType::from_flag)
}
