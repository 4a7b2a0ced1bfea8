use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] plinth_fs::Error),

    #[error("failed to list '{path}': {source}")]
    List { path: PathBuf, source: io::Error },

    #[error("version '{version}' of '{name}' does not exist at '{path}'")]
    MissingVersion {
        name:    String,
        version: String,
        path:    PathBuf,
    },

    #[error("refusing to remove '{name}' {version}: it is the current version")]
    VersionInUse { name: String, version: String },

    #[error("'{path}' already exists")]
    VersionExists { path: PathBuf },

    #[error("receipt '{path}' is malformed: {source}")]
    MalformedReceipt {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode receipt for '{name}': {source}")]
    EncodeReceipt {
        name:   String,
        source: serde_json::Error,
    },
}

impl Error {
    /// The filesystem location the error is about.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Fs(e) => Some(e.path()),
            Self::List { path, .. }
            | Self::MissingVersion { path, .. }
            | Self::VersionExists { path }
            | Self::MalformedReceipt { path, .. } => Some(path),
            Self::VersionInUse { .. } | Self::EncodeReceipt { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
