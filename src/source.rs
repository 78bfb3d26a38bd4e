//! Dataset loading. Each run loads the table exactly once through a `DataSource`.

use crate::csv_reader::CsvData;
use crate::error::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Somewhere a rental table can be loaded from
pub trait DataSource {
    /// Human-readable location, for logs and summaries
    fn describe(&self) -> String;

    /// Read and parse the whole table
    ///
    /// # Errors
    /// Returns error if the source cannot be read or is not valid delimited text
    fn load(&self, delimiter: u8) -> Result<CsvData>;
}

/// A table on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self, delimiter: u8) -> Result<CsvData> {
        debug!("Reading {}", self.path.display());
        CsvData::from_file(&self.path, delimiter)
    }
}

/// A table fetched with a blocking HTTP GET
pub struct UrlSource {
    url: String,
    timeout: Duration,
}

impl UrlSource {
    #[must_use]
    pub fn new(url: String, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

impl DataSource for UrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self, delimiter: u8) -> Result<CsvData> {
        info!("Downloading {}", self.url);
        let response = ureq::get(&self.url).timeout(self.timeout).call()?;
        debug!("HTTP {} from {}", response.status(), self.url);
        CsvData::from_reader(response.into_reader(), delimiter)
    }
}
