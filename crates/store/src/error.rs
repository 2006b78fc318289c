use recall_indexer::IndexerError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("File missing or moved: {}", path.display())]
    FileMissing { id: String, path: PathBuf },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("A scan is already in progress")]
    ScanInProgress,

    #[error("State file error at {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },

    #[error("Scan failed: {0}")]
    Scan(String),
}

/// Coarse classification used by front-ends to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Filesystem,
    Validation,
    Conflict,
    Persistence,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound(_) | Self::FileMissing { .. } => ErrorKind::NotFound,
            Self::Filesystem { .. } | Self::Scan(_) => ErrorKind::Filesystem,
            Self::Validation(_) => ErrorKind::Validation,
            Self::ScanInProgress => ErrorKind::Conflict,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<IndexerError> for StoreError {
    fn from(err: IndexerError) -> Self {
        match err {
            IndexerError::Filesystem { path, source } => Self::Filesystem { path, source },
            IndexerError::InvalidPath(msg) | IndexerError::InvalidRoot(msg) => {
                Self::Validation(msg)
            }
            IndexerError::Other(msg) => Self::Scan(msg),
        }
    }
}
