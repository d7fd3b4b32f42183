//! Conversion of one QRDA III document into QPP JSON.
//!
//! A conversion moves through `Start → Loading → Decoding → Validating →
//! Encoding → Done`. Any stage may end in `Failed`, in which case the caller
//! receives a [`TransformError`] carrying a non-empty [`AllErrors`] report and
//! no output.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::config::{NOT_VALID_QRDA_DOCUMENT, NOT_VALID_XML_DOCUMENT, UNEXPECTED_ERROR};
use crate::context::Context;
use crate::decode;
use crate::encode::{self, JsonWrapper};
use crate::error::TransformError;
use crate::model::AllErrors;
use crate::source::{PathQrdaSource, QrdaSource};
use crate::validate;

/// Position of a conversion in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    Loading,
    Decoding,
    Validating,
    Encoding,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "Start",
            Self::Loading => "Loading",
            Self::Decoding => "Decoding",
            Self::Validating => "Validating",
            Self::Encoding => "Encoding",
            Self::Done => "Done",
            Self::Failed => "Failed",
        })
    }
}

/// Converts the document behind a [`QrdaSource`].
///
/// # Examples
/// ```
/// use qpp_converter::converter::{Converter, Stage};
/// use qpp_converter::source::StreamQrdaSource;
///
/// let mut converter = Converter::new(StreamQrdaSource::from_bytes("report.xml", "not xml"));
/// let err = converter.transform().unwrap_err();
///
/// assert_eq!(err.stage(), Stage::Loading);
/// assert_eq!(
///     err.details().messages().collect::<Vec<_>>(),
///     vec!["not a valid XML document"]
/// );
/// assert_eq!(converter.stage(), Stage::Failed);
/// ```
pub struct Converter {
    source: Box<dyn QrdaSource>,
    context: Context,
    stage: Stage,
}

impl Converter {
    /// Create a converter with the default context.
    pub fn new(source: impl QrdaSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    /// Create a converter over an already boxed source.
    #[must_use]
    pub fn from_boxed(source: Box<dyn QrdaSource>) -> Self {
        Self {
            source,
            context: Context::default(),
            stage: Stage::Start,
        }
    }

    /// Create a converter for a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(PathQrdaSource::new(path.as_ref()))
    }

    /// Replace the context.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable context, for toggling defaults or validation.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Name of the document being converted.
    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// State reached by the last `transform()` call.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the conversion.
    ///
    /// # Errors
    /// Returns a `TransformError` naming the failed stage. Structural failures
    /// carry exactly one error with one detail; validation failures carry the
    /// full validation report.
    pub fn transform(&mut self) -> Result<JsonWrapper, TransformError> {
        tracing::info!(
            source = %self.source.name(),
            program = %self.context.program(),
            "Converting"
        );

        let current = Cell::new(Stage::Start);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(&current)));
        let result = outcome.unwrap_or_else(|_| {
            tracing::warn!(source = %self.source.name(), stage = %current.get(), "Conversion panicked");
            Err(self.structural(current.get(), UNEXPECTED_ERROR))
        });

        match &result {
            Ok(_) => {
                self.stage = Stage::Done;
                tracing::info!(source = %self.source.name(), "Conversion succeeded");
            }
            Err(e) => {
                self.stage = Stage::Failed;
                tracing::info!(source = %self.source.name(), error = %e, "Conversion failed");
            }
        }
        result
    }

    fn run(&self, current: &Cell<Stage>) -> Result<JsonWrapper, TransformError> {
        current.set(Stage::Loading);
        let bytes = self.source.read_all().map_err(|e| {
            tracing::warn!(error = %e, "Failed to acquire document");
            self.structural(Stage::Loading, UNEXPECTED_ERROR)
        })?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| self.structural(Stage::Loading, NOT_VALID_XML_DOCUMENT))?;
        let document = roxmltree::Document::parse(text).map_err(|e| {
            tracing::debug!(error = %e, "XML parse failed");
            self.structural(Stage::Loading, NOT_VALID_XML_DOCUMENT)
        })?;

        current.set(Stage::Decoding);
        let tree = decode::decode(&self.context, document.root_element()).map_err(|e| {
            tracing::debug!(error = %e, "Decode rejected document");
            self.structural(Stage::Decoding, NOT_VALID_QRDA_DOCUMENT)
        })?;
        tracing::debug!(nodes = tree.subtree_len(), "Decoded document");

        current.set(Stage::Validating);
        let errors = validate::validate(&self.context, &tree);
        if !errors.is_empty() {
            tracing::debug!(errors = errors.errors().len(), "Validation failed");
            return Err(TransformError::new(Stage::Validating, errors));
        }

        current.set(Stage::Encoding);
        let wrapper = encode::encode(&self.context, &tree).map_err(|e| {
            tracing::warn!(error = %e, "Encoding failed");
            self.structural(Stage::Encoding, NOT_VALID_XML_DOCUMENT)
        })?;

        current.set(Stage::Done);
        Ok(wrapper)
    }

    fn structural(&self, stage: Stage, message: &str) -> TransformError {
        TransformError::new(stage, AllErrors::structural(self.source.name(), message))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("source", &self.source.name())
            .field("context", &self.context)
            .field("stage", &self.stage)
            .finish()
    }
}
