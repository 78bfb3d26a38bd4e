use crate::error::{RentalError, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Represents a parsed delimited-text table with headers and rows
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvData {
    /// Parse a delimited-text file
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a record is malformed
    pub fn from_file(path: &Path, delimiter: u8) -> Result<Self> {
        let reader = std::fs::File::open(path)?;
        Self::from_reader(reader, delimiter)
    }

    /// Parse delimited text from any reader (file, HTTP body, in-memory buffer)
    ///
    /// # Errors
    /// Returns error if a record is malformed
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(ToString::to_string).collect();
            rows.push(row);
        }

        Ok(CsvData { headers, rows })
    }

    /// Get number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Get column index by name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but a missing column is an error
    ///
    /// # Errors
    /// Returns `MissingColumn` if no header matches `name`
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| RentalError::MissingColumn(name.to_string()))
    }

    /// Get a cell, treating short rows as empty
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}
