use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("CSV error: {0}")]
    CsvError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::IoError(err.to_string())
    }
}

impl From<csv::Error> for ScanError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ScanError::IoError(e.to_string()),
            other => ScanError::CsvError(format!("{:?}", other)),
        }
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        ScanError::IoError(err.to_string())
    }
}
