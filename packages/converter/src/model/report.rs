//! Structured defect report: `AllErrors` → `Error` → `Detail`.

use serde::{Deserialize, Serialize};

/// One concrete defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    /// Human readable message.
    pub message: String,

    /// Location of the defect in the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Detail {
    /// Create a detail without a location.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Attach a location; empty paths are ignored.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = (!path.is_empty()).then_some(path);
        self
    }
}

/// All defects tied to one top-level failing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// What failed: a document name for structural failures, a template name
    /// for validation failures.
    pub source_identifier: String,

    /// Location of the failing source, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Defects in traversal order.
    pub details: Vec<Detail>,
}

impl Error {
    /// Create an error with no details yet.
    #[must_use]
    pub fn new(source_identifier: impl Into<String>) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            path: None,
            details: Vec::new(),
        }
    }

    /// Attach a location; empty paths are ignored.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = (!path.is_empty()).then_some(path);
        self
    }

    /// Append a detail.
    #[must_use]
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.details.push(detail);
        self
    }

    /// Append a detail in place.
    pub fn add_detail(&mut self, detail: Detail) {
        self.details.push(detail);
    }
}

/// Full result of a failed conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllErrors {
    /// One entry per distinct failing source, in traversal order.
    pub errors: Vec<Error>,
}

impl AllErrors {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single structural failure: one error, one detail.
    #[must_use]
    pub fn structural(source_identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![Error::new(source_identifier).with_detail(Detail::new(message))],
        }
    }

    /// Append an error.
    pub fn add_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Errors in order.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// `true` when no error has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of details across all errors.
    #[must_use]
    pub fn detail_count(&self) -> usize {
        self.errors.iter().map(|e| e.details.len()).sum()
    }

    /// Iterate every detail message, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .flat_map(|e| e.details.iter())
            .map(|d| d.message.as_str())
    }

    /// Serialize as pretty printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
