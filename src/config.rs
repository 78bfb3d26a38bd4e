//! Configuration file handling.
//!
//! Settings come from `rentstat.toml` (or `--config FILE`) and are then
//! overridden by command-line arguments. Every field has a default, so an
//! empty file is a valid configuration.

use crate::cli::AnalyzeArgs;
use crate::structs::{
    ClassifierMode, DayType, FlagEncoding, KeyOrder, RentalError, Result, Season, WeekdayLocale,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rentstat.toml";

/// Public daily rental dataset.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/rootAmr/Bike_Dataset/refs/heads/main/data_day_clean.csv";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub columns: ColumnMapping,

    #[serde(default)]
    pub encoding: EncodingConfig,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub filter: FilterConfig,
}

/// Where the dataset comes from and how it is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Dataset URL, used when no local file is given.
    #[serde(default = "default_url")]
    pub url: String,

    /// Field delimiter (single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// chrono format string for the date column and date filters.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            delimiter: default_delimiter(),
            date_format: default_date_format(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATA_URL.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Dataset column names. An empty `weekday`, `year` or `month` means "take it from the date".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub date: String,
    pub weekday: String,
    pub season: String,
    pub year: String,
    pub month: String,
    pub holiday: String,
    pub working_day: String,
    pub weather: String,
    pub temperature: String,
    pub count: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "dteday".to_string(),
            weekday: "weekday".to_string(),
            season: "season".to_string(),
            year: "yr".to_string(),
            month: "mnth".to_string(),
            holiday: "holiday".to_string(),
            working_day: "workingday".to_string(),
            weather: "weathersit".to_string(),
            temperature: "temp".to_string(),
            count: "total_count".to_string(),
        }
    }
}

/// How raw cell values are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Values read as true in boolean-like columns (case-insensitive).
    #[serde(default = "default_truthy")]
    pub truthy: Vec<String>,

    /// Values read as false in boolean-like columns (case-insensitive).
    #[serde(default = "default_falsy")]
    pub falsy: Vec<String>,

    /// How the weekday column is spelled: `id`, `en`, or `numeric` (0 = Sunday).
    #[serde(default)]
    pub weekday_locale: WeekdayLocale,

    /// Year values below 1000 are offsets from this year.
    #[serde(default = "default_year_base")]
    pub year_base: i32,

    /// Multiplier turning the temperature column into degrees Celsius.
    #[serde(default = "default_temperature_scale")]
    pub temperature_scale: f64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            truthy: default_truthy(),
            falsy: default_falsy(),
            weekday_locale: WeekdayLocale::default(),
            year_base: default_year_base(),
            temperature_scale: default_temperature_scale(),
        }
    }
}

fn default_truthy() -> Vec<String> {
    ["1", "yes", "true", "y"].into_iter().map(String::from).collect()
}

fn default_falsy() -> Vec<String> {
    ["0", "no", "false", "n"].into_iter().map(String::from).collect()
}

fn default_year_base() -> i32 {
    2011
}

fn default_temperature_scale() -> f64 {
    1.0
}

/// Analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Rule deriving the day-type of each record.
    #[serde(default)]
    pub classifier: ClassifierMode,

    /// Day-type rows to always show, in order. Empty means "only the ones present".
    #[serde(default = "default_day_type_order")]
    pub day_type_order: Vec<DayType>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierMode::default(),
            day_type_order: default_day_type_order(),
        }
    }
}

fn default_day_type_order() -> Vec<DayType> {
    vec![DayType::NonWorking, DayType::Working]
}

/// Record filters. An absent list applies no filter; an empty list selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<i32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<Season>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_types: Option<Vec<DayType>>,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RentalError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `--config FILE` if given, else `rentstat.toml` if present, else defaults.
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be parsed
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            debug!("Loading config from {DEFAULT_CONFIG_FILE}");
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot check on its own.
    ///
    /// # Errors
    /// Returns `Config` error describing the first problem found
    pub fn validate(&self) -> Result<()> {
        self.delimiter()?;

        let encoding = &self.encoding;
        if let Some(v) = encoding
            .truthy
            .iter()
            .find(|v| encoding.falsy.iter().any(|f| f.eq_ignore_ascii_case(v)))
        {
            return Err(RentalError::Config(format!(
                "'{v}' is listed as both truthy and falsy"
            )));
        }

        if !encoding.temperature_scale.is_finite() || encoding.temperature_scale == 0.0 {
            return Err(RentalError::Config(
                "temperature_scale must be a non-zero number".into(),
            ));
        }

        let order = &self.analysis.day_type_order;
        if let Some((_, dup)) = order
            .iter()
            .enumerate()
            .find(|(i, k)| order[..*i].contains(k))
        {
            return Err(RentalError::Config(format!(
                "day_type_order lists '{dup}' twice"
            )));
        }

        Ok(())
    }

    /// Field delimiter as a byte.
    ///
    /// # Errors
    /// Returns error unless the delimiter is exactly one ASCII character
    pub fn delimiter(&self) -> Result<u8> {
        match self.source.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(RentalError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.source.delimiter
            ))),
        }
    }

    #[must_use]
    pub fn flag_encoding(&self) -> FlagEncoding {
        FlagEncoding {
            truthy: self.encoding.truthy.clone(),
            falsy: self.encoding.falsy.clone(),
        }
    }

    #[must_use]
    pub fn day_type_order(&self) -> KeyOrder<DayType> {
        if self.analysis.day_type_order.is_empty() {
            KeyOrder::Natural
        } else {
            KeyOrder::Reindex(self.analysis.day_type_order.clone())
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; only explicitly given arguments override.
    ///
    /// # Errors
    /// Returns error if an argument value cannot be parsed
    pub fn merge_with_args(&mut self, args: &AnalyzeArgs) -> Result<()> {
        if let Some(ref url) = args.url {
            self.source.url.clone_from(url);
        }
        if args.tsv {
            self.source.delimiter = "\t".to_string();
        }
        if let Some(ref classifier) = args.classifier {
            self.analysis.classifier = ClassifierMode::from_str(classifier)?;
        }

        if let Some(ref start) = args.start {
            self.filter.start = Some(start.clone());
        }
        if let Some(ref end) = args.end {
            self.filter.end = Some(end.clone());
        }
        if let Some(ref years) = args.years {
            self.filter.years = Some(parse_list(years, |s| {
                s.parse::<i32>()
                    .map_err(|_| RentalError::InvalidInput(format!("invalid year '{s}'")))
            })?);
        }
        if let Some(ref seasons) = args.seasons {
            self.filter.seasons = Some(parse_list(seasons, Season::from_str)?);
        }
        if let Some(ref day_types) = args.day_types {
            self.filter.day_types = Some(parse_list(day_types, DayType::from_str)?);
        }

        self.validate()
    }

    /// Generate default configuration file content.
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default())
            .map_err(|e| RentalError::Config(format!("Failed to serialize config: {e}")))
    }
}

/// Parse a comma-separated selection. Empty input or `none` selects nothing.
///
/// # Errors
/// Returns the first item error
pub fn parse_list<T, F>(raw: &str, parse: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> Result<T>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect()
}
