use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("link '{link}' points outside the archive: '{target}'")]
    LinkEscape { link: PathBuf, target: PathBuf },

    #[error("archive '{path}' is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("file rule '{from}' -> '{to}' escapes the install directory")]
    UnsafeRule { from: String, to: String },

    #[error("file rule '{from}' matched nothing")]
    NoMatch { from: String },

    #[error("failed to extract '{path}': {source}")]
    Extract { path: PathBuf, source: io::Error },
}

impl Error {
    /// True when the problem lies in manifest data rather than the artifact
    /// or the filesystem.
    pub fn is_manifest_problem(&self) -> bool {
        matches!(self, Self::UnsafeRule { .. } | Self::NoMatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
