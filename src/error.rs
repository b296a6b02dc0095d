/// Error taxonomy for the launcher core
///
/// None of these are fatal: every caller logs the error and stays in the
/// state it was in before the failed operation.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    /// The projects directory is missing or has no project folders
    #[error("no project folders found in {0}")]
    EmptyRegistry(PathBuf),

    /// Selection attempted but the folder has no matching executable
    #[error("executable not found: {path}")]
    MissingExecutable { path: PathBuf },

    /// `icon.png` exists but could not be decoded
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The executable exists but the OS refused to start it
    #[error("failed to launch {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LauncherError>;
