//! Typed records from raw table cells
//!
//! All categorical coercion happens here, once, at load time. The analysis
//! functions only ever see checked `RentalRecord`s.

use super::classify::{classify_flag, classify_weekday_name, DayNames};
use crate::config::Config;
use crate::structs::{
    ClassifierMode, CsvData, DayType, RentalError, RentalRecord, Result, Season, Weather,
};
use chrono::{Datelike, NaiveDate};

impl Season {
    /// Accepts the 1-4 season code, English names, and Indonesian names
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the value if it is not a known season
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "spring" | "semi" => Ok(Self::Spring),
            "2" | "summer" | "panas" => Ok(Self::Summer),
            "3" | "fall" | "autumn" | "gugur" => Ok(Self::Fall),
            "4" | "winter" | "dingin" => Ok(Self::Winter),
            _ => Err(RentalError::InvalidInput(format!(
                "unrecognized season '{raw}'"
            ))),
        }
    }
}

impl Weather {
    /// Accepts the 1-4 weather situation code or a condition name
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the value if it is not a known condition
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "clear" | "cerah" => Ok(Self::Clear),
            "2" | "mist" | "misty" | "berkabut" => Ok(Self::Mist),
            "3" | "light-precipitation" | "light snow/rain" | "light rain" | "hujan ringan" => {
                Ok(Self::LightPrecipitation)
            }
            "4" | "heavy-precipitation" | "heavy rain" | "hujan lebat" => {
                Ok(Self::HeavyPrecipitation)
            }
            _ => Err(RentalError::InvalidInput(format!(
                "unrecognized weather condition '{raw}'"
            ))),
        }
    }
}

/// Parse a date with a chrono format string
///
/// # Errors
/// Returns `DateParse` naming the value and the expected format
pub fn parse_date(raw: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format).map_err(|_| RentalError::DateParse {
        value: raw.to_string(),
        format: format.to_string(),
    })
}

/// Column positions resolved against the table header
struct ColumnIndices {
    date: usize,
    weekday: Option<usize>,
    season: usize,
    year: Option<usize>,
    month: Option<usize>,
    holiday: usize,
    working_day: usize,
    weather: usize,
    temperature: usize,
    count: usize,
}

impl ColumnIndices {
    fn resolve(csv: &CsvData, config: &Config) -> Result<Self> {
        let columns = &config.columns;
        let optional = |name: &str| -> Result<Option<usize>> {
            if name.is_empty() {
                Ok(None)
            } else {
                csv.require_column(name).map(Some)
            }
        };

        Ok(Self {
            date: csv.require_column(&columns.date)?,
            weekday: optional(&columns.weekday)?,
            season: csv.require_column(&columns.season)?,
            year: optional(&columns.year)?,
            month: optional(&columns.month)?,
            holiday: csv.require_column(&columns.holiday)?,
            working_day: csv.require_column(&columns.working_day)?,
            weather: csv.require_column(&columns.weather)?,
            temperature: csv.require_column(&columns.temperature)?,
            count: csv.require_column(&columns.count)?,
        })
    }
}

/// Prefix a cell error with its location; line numbers count the header as line 1
fn at_cell(row: usize, column: &str, err: RentalError) -> RentalError {
    let detail = match err {
        RentalError::InvalidInput(msg) => msg,
        other => other.to_string(),
    };
    RentalError::InvalidInput(format!("line {}, column '{column}': {detail}", row + 2))
}

fn parse_year(raw: &str, base: i32) -> Result<i32> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| RentalError::InvalidInput(format!("invalid year '{raw}'")))?;
    if (0..1000).contains(&year) {
        Ok(base + year)
    } else {
        Ok(year)
    }
}

fn parse_month(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| RentalError::InvalidInput(format!("invalid month '{raw}'")))
}

fn parse_temperature(raw: &str, scale: f64) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .map(|t| t * scale)
        .ok_or_else(|| RentalError::InvalidInput(format!("invalid temperature '{raw}'")))
}

/// Rental counts are non-negative integers; `985.0` is accepted as 985
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(raw: &str) -> Result<u32> {
    let value = raw.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(RentalError::InvalidInput(format!(
            "invalid rental count '{raw}'"
        ))),
    }
}

impl RentalRecord {
    /// Convert every row of the table into a typed record
    ///
    /// # Errors
    /// Returns error on a missing column or the first cell that cannot be decoded
    pub fn from_csv(csv: &CsvData, config: &Config) -> Result<Vec<Self>> {
        let idx = ColumnIndices::resolve(csv, config)?;
        let columns = &config.columns;
        let encoding = config.flag_encoding();
        let names = DayNames::for_locale(config.encoding.weekday_locale);
        let date_format = &config.source.date_format;

        let mut records = Vec::with_capacity(csv.row_count());

        for row in 0..csv.row_count() {
            let cell = move |col: usize| csv.cell(row, col);

            let date = parse_date(cell(idx.date), date_format)
                .map_err(|e| at_cell(row, &columns.date, e))?;
            let weekday = match idx.weekday {
                Some(col) => names
                    .weekday(cell(col))
                    .map_err(|e| at_cell(row, &columns.weekday, e))?,
                None => date.weekday(),
            };
            let season = Season::parse(cell(idx.season))
                .map_err(|e| at_cell(row, &columns.season, e))?;
            let year = match idx.year {
                Some(col) => parse_year(cell(col), config.encoding.year_base)
                    .map_err(|e| at_cell(row, &columns.year, e))?,
                None => date.year(),
            };
            let month = match idx.month {
                Some(col) => parse_month(cell(col)).map_err(|e| at_cell(row, &columns.month, e))?,
                None => date.month(),
            };
            let holiday = encoding
                .parse_flag(cell(idx.holiday))
                .map_err(|e| at_cell(row, &columns.holiday, e))?;
            let working_day = encoding
                .parse_flag(cell(idx.working_day))
                .map_err(|e| at_cell(row, &columns.working_day, e))?;
            let weather = Weather::parse(cell(idx.weather))
                .map_err(|e| at_cell(row, &columns.weather, e))?;
            let temperature =
                parse_temperature(cell(idx.temperature), config.encoding.temperature_scale)
                    .map_err(|e| at_cell(row, &columns.temperature, e))?;
            let count =
                parse_count(cell(idx.count)).map_err(|e| at_cell(row, &columns.count, e))?;

            let day_type = match config.analysis.classifier {
                ClassifierMode::WeekdayName => match idx.weekday {
                    Some(col) => classify_weekday_name(cell(col), &names)
                        .map_err(|e| at_cell(row, &columns.weekday, e))?,
                    None => DayType::from_weekday(weekday),
                },
                ClassifierMode::Flag => classify_flag(cell(idx.working_day), &encoding)
                    .map_err(|e| at_cell(row, &columns.working_day, e))?,
            };

            records.push(Self {
                date,
                weekday,
                season,
                year,
                month,
                holiday,
                working_day,
                weather,
                temperature,
                count,
                day_type,
            });
        }

        Ok(records)
    }
}
