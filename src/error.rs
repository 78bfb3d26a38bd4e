use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(Box<ureq::Error>),

    #[error("Missing column '{0}' in dataset")]
    MissingColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot parse date '{value}' (expected format {format})")]
    DateParse { value: String, format: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ureq::Error> for RentalError {
    fn from(e: ureq::Error) -> Self {
        RentalError::Http(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;
