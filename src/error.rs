use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Download failed: {name}")]
    DownloadFailed { name: String },

    #[error("Extraction failed: {name}: {source}")]
    ExtractFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not create scratch directory in {path}: {source}")]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport unavailable: {message}")]
    TransportUnavailable { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Manifest error: {message}")]
    ManifestError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub fn manifest_error<S: Into<String>>(message: S) -> Self {
        FetchError::ManifestError {
            message: message.into(),
        }
    }

    /// Name of the archive the error is about, if any.
    pub fn archive_name(&self) -> Option<&str> {
        match self {
            FetchError::DownloadFailed { name } | FetchError::ExtractFailed { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }
}
