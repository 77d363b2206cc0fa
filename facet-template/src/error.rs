//! Error type for template storage access.

use std::io;
use std::path::{Path, PathBuf};

/// Error returned when a template or an include file cannot be read.
///
/// Rendering itself never fails: unresolved variables, unknown transforms and
/// malformed markers all degrade to text. Reading from storage is the only
/// operation that reports an error.
#[derive(Debug)]
#[non_exhaustive]
pub enum TemplateError {
    /// Reading a file failed.
    Io {
        /// The file we tried to read.
        path: PathBuf,
        /// The underlying I/O error, untouched.
        source: io::Error,
    },
}

impl TemplateError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        TemplateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path of the file that could not be read.
    pub fn path(&self) -> &Path {
        match self {
            TemplateError::Io { path, .. } => path,
        }
    }

    /// The I/O error reported by the storage layer.
    pub fn io_error(&self) -> &io::Error {
        match self {
            TemplateError::Io { source, .. } => source,
        }
    }
}

impl core::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TemplateError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl core::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TemplateError::Io { source, .. } => Some(source),
        }
    }
}
