use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Page-level failures. Anything here aborts the whole `load_page` call;
/// per-resource failures are a separate, recovered-from category
/// (see [`ResourceDownloadError`]).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Output path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Network error: unable to connect to {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {url}")]
    Http { status: u16, url: String },

    #[error("Permission denied: cannot write to {0}")]
    PermissionDenied(PathBuf),

    #[error("Write target missing: {0}")]
    WriteTargetMissing(PathBuf),

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Maps a filesystem error onto the closed taxonomy above. Kept as a single
/// function so every write site classifies identically.
pub fn classify_io_error(error: io::Error, path: &Path) -> LoadError {
    match error.kind() {
        io::ErrorKind::PermissionDenied => LoadError::PermissionDenied(path.to_path_buf()),
        io::ErrorKind::NotFound => LoadError::WriteTargetMissing(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

/// Failure downloading or storing a single resource. Recorded per candidate
/// and logged; never propagated out of the orchestrator.
#[derive(Debug, Error)]
#[error("Failed to download resource {url}: {reason}")]
pub struct ResourceDownloadError {
    pub url: String,
    pub reason: String,
}
