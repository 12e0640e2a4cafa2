use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Ingestion failure in '{source_name}': {details}")]
    Ingestion { source_name: String, details: String },

    #[error("Invalid aggregation input for {context}: {details}")]
    InvalidData { context: String, details: String },

    #[error("Failed to write report to '{destination}': {details}")]
    SinkWrite {
        destination: String,
        details: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
