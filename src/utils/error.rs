use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML processing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Catalog parse error: {message}")]
    ParseError { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure of a single external-service call. The enrichment stages
/// pattern-match on this instead of catching broad errors; every variant
/// degrades the affected fields to their sentinels and the run continues.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),
}
