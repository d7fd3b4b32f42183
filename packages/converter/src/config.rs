//! Configuration constants and environment-driven settings for the converter.

use std::env;
use std::sync::LazyLock;

use regex::Regex;

use crate::context::Context;
use crate::error::Result;
use crate::model::Program;

/// Structural detail for content that is not well-formed XML.
pub const NOT_VALID_XML_DOCUMENT: &str = "not a valid XML document";

/// Structural detail for XML whose root is not a QRDA III clinical document.
pub const NOT_VALID_QRDA_DOCUMENT: &str = "not a valid QRDA document";

/// Structural detail for any internal fault.
pub const UNEXPECTED_ERROR: &str = "unexpected error";

/// Maximum document size accepted from a source (50 MB).
pub const MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

/// Suffix of the file written for a successful conversion.
pub const OUTPUT_SUFFIX: &str = ".qpp.json";

/// Suffix of the file written for a failed conversion.
pub const ERROR_SUFFIX: &str = "-error.json";

/// `id/@root` of a taxpayer identification number.
pub const TIN_ROOT: &str = "2.16.840.1.113883.4.2";

/// `id/@root` of a national provider identifier.
pub const NPI_ROOT: &str = "2.16.840.1.113883.4.6";

/// `id/@root` of an eMeasure version-specific identifier.
pub const EMEASURE_ROOT: &str = "2.16.840.1.113883.4.738";

/// `id/@root` of the intended recipient (program name).
pub const PROGRAM_ROOT: &str = "2.16.840.1.113883.3.249.7";

/// Submission method written for every measurement set.
pub const SUBMISSION_METHOD: &str = "electronicHealthRecord";

/// Environment variable selecting the program.
pub const ENV_PROGRAM: &str = "QPP_PROGRAM";

/// Environment variable disabling the default decoder.
pub const ENV_SKIP_DEFAULTS: &str = "QPP_SKIP_DEFAULTS";

/// Environment variable disabling validation.
pub const ENV_SKIP_VALIDATION: &str = "QPP_SKIP_VALIDATION";

/// TIN pattern: 9 digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static TIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9}$").expect("valid regex"));

/// NPI pattern: 10 digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static NPI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));

/// Date pattern: YYYYMMDD, optionally followed by a time.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}(\d{2,6})?([+-]\d{4})?$").expect("valid regex"));

/// Settings that select how documents are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Program whose handlers take precedence.
    pub program: Program,
    /// Apply the default decoder to unrecognised templates.
    pub do_defaults: bool,
    /// Run the validation stage.
    pub do_validation: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: Program::All,
            do_defaults: true,
            do_validation: true,
        }
    }
}

impl ConverterConfig {
    /// Read settings from `QPP_PROGRAM`, `QPP_SKIP_DEFAULTS` and
    /// `QPP_SKIP_VALIDATION`, falling back to the defaults.
    ///
    /// # Errors
    /// Returns `InvalidProgram` if `QPP_PROGRAM` names an unknown program.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `InvalidProgram` if the program variable names an unknown program.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(program) = lookup(ENV_PROGRAM).filter(|p| !p.trim().is_empty()) {
            config.program = program.parse()?;
        }
        if lookup(ENV_SKIP_DEFAULTS).is_some_and(|v| is_truthy(&v)) {
            config.do_defaults = false;
        }
        if lookup(ENV_SKIP_VALIDATION).is_some_and(|v| is_truthy(&v)) {
            config.do_validation = false;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_program(mut self, program: Program) -> Self {
        self.program = program;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, enabled: bool) -> Self {
        self.do_defaults = enabled;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.do_validation = enabled;
        self
    }

    /// Build a conversion context from these settings.
    #[must_use]
    pub fn into_context(self) -> Context {
        Context::new(self.program)
            .with_defaults(self.do_defaults)
            .with_validation(self.do_validation)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
