//! Document sources.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::MAX_DOCUMENT_SIZE;
use crate::error::SourceError;

/// Supplies the content of one QRDA document.
///
/// A source may be opened more than once; each call starts a fresh read.
pub trait QrdaSource: Send + Sync {
    /// Name used as the source identifier in structural error reports.
    fn name(&self) -> &str;

    /// Open a new reader over the document content.
    ///
    /// # Errors
    /// Returns a `SourceError` when the content cannot be acquired.
    fn open(&self) -> Result<Box<dyn Read + Send>, SourceError>;

    /// Read the whole document, up to [`MAX_DOCUMENT_SIZE`] bytes.
    ///
    /// # Errors
    /// Returns `TooLarge` past the size limit, or the failure from
    /// [`QrdaSource::open`] or the read itself.
    fn read_all(&self) -> Result<Vec<u8>, SourceError> {
        let mut bytes = Vec::new();
        self.open()?
            .take(MAX_DOCUMENT_SIZE + 1)
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Io {
                name: self.name().to_string(),
                source,
            })?;
        if bytes.len() as u64 > MAX_DOCUMENT_SIZE {
            return Err(SourceError::TooLarge {
                name: self.name().to_string(),
                limit: MAX_DOCUMENT_SIZE,
            });
        }
        Ok(bytes)
    }
}

/// A document on disk.
#[derive(Debug, Clone)]
pub struct PathQrdaSource {
    path: PathBuf,
    name: String,
}

impl PathQrdaSource {
    /// Create a source for a file; its name is the file name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QrdaSource for PathQrdaSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn Read + Send>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            name: self.name.clone(),
            source,
        })?;
        Ok(Box::new(file))
    }
}

/// Produces a reader for a stream source, or `None` when no content exists.
pub type StreamSupplier = dyn Fn() -> Option<Box<dyn Read + Send>> + Send + Sync;

/// A document produced on demand by a supplier function.
pub struct StreamQrdaSource {
    name: String,
    supplier: Box<StreamSupplier>,
}

impl StreamQrdaSource {
    /// Create a named stream source.
    pub fn new<F>(name: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Option<Box<dyn Read + Send>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            supplier: Box::new(supplier),
        }
    }

    /// Source serving a fixed in-memory document.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self::new(name, move || {
            Some(Box::new(std::io::Cursor::new(bytes.clone())) as Box<dyn Read + Send>)
        })
    }
}

impl fmt::Debug for StreamQrdaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamQrdaSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl QrdaSource for StreamQrdaSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn Read + Send>, SourceError> {
        (self.supplier)().ok_or_else(|| SourceError::NoContent(self.name.clone()))
    }
}
