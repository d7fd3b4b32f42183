//! Error types for the converter.
//!
//! `ConverterError` covers library and CLI failures. A failed conversion is a
//! `TransformError`, which always carries the full `AllErrors` report. The
//! smaller enums describe faults inside a single stage before the converter
//! folds them into that report.

use thiserror::Error;

use crate::converter::Stage;
use crate::model::AllErrors;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Unknown reporting program name.
    #[error("Invalid program name: '{0}'. Expected one of ALL, MIPS, CPCPLUS")]
    InvalidProgram(String),

    /// A conversion failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Some files in a batch did not convert.
    #[error("{failed} of {total} file(s) failed to convert")]
    BatchFailed { failed: usize, total: usize },
}

/// Failure of a single `transform()` call.
#[derive(Debug, Clone, Error)]
#[error(
    "Transformation failed during {stage}: {} error(s), {} detail(s)",
    .details.errors().len(),
    .details.detail_count()
)]
pub struct TransformError {
    stage: Stage,
    details: AllErrors,
}

impl TransformError {
    /// Create a transform error for the stage that failed.
    #[must_use]
    pub fn new(stage: Stage, details: AllErrors) -> Self {
        Self { stage, details }
    }

    /// The stage that was running when the conversion failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The aggregated defect report.
    #[must_use]
    pub fn details(&self) -> &AllErrors {
        &self.details
    }

    /// Take ownership of the defect report.
    #[must_use]
    pub fn into_details(self) -> AllErrors {
        self.details
    }
}

/// Failure to acquire document content.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the document failed.
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The source produced no content stream.
    #[error("No content available for {0}")]
    NoContent(String),

    /// The document exceeds the size limit.
    #[error("{name} exceeds the maximum document size of {limit} bytes")]
    TooLarge { name: String, limit: u64 },
}

/// Structural failure while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The root element does not carry the QRDA III document template.
    #[error("Root element <{0}> is not a QRDA III clinical document")]
    NotValidQrda(String),
}

/// Unrecoverable fault inside an encoder.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value expected to be an integer was not.
    #[error("Field '{field}' expects an integer, got '{value}'")]
    NotAnInteger { field: String, value: String },

    /// A value expected to be a `YYYYMMDD` date was not.
    #[error("Field '{field}' expects a YYYYMMDD date, got '{value}'")]
    InvalidDate { field: String, value: String },

    /// A required value was absent from the node being encoded.
    #[error("Missing value '{field}' on {template}")]
    MissingValue { field: String, template: String },

    /// Generic encoder failure with a message.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
