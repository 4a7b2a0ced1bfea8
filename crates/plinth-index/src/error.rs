use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed manifest data. Never retryable: the manifest must be fixed.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("plugin name must not be empty")]
    EmptyName,

    #[error("invalid plugin name '{0}': only letters, digits, '.', '_' and '-' are allowed, and it must not start with '.'")]
    InvalidName(String),

    #[error("plugin '{name}': version must not be empty")]
    EmptyVersion { name: String },

    #[error("plugin '{name}': invalid version '{version}'")]
    InvalidVersion { name: String, version: String },

    #[error("plugin '{name}': platform[{index}]: {problem}")]
    Artifact {
        name:    String,
        index:   usize,
        problem: ArtifactProblem,
    },
}

#[derive(Debug, Error)]
pub enum ArtifactProblem {
    #[error("neither uri nor head is set")]
    NoSource,

    #[error("uri is set but sha256 is empty")]
    MissingChecksum,

    #[error("head install requested but the artifact has no head")]
    NoHead,
}

/// Failures of the on-disk index provider.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("plugin '{name}' not found in index")]
    NotFound { name: String, path: PathBuf },

    #[error("failed to parse manifest '{path}': {source}")]
    Parse {
        path:   PathBuf,
        source: toml::de::Error,
    },

    #[error("manifest '{path}' declares plugin '{declared}', expected '{expected}'")]
    NameMismatch {
        path:     PathBuf,
        declared: String,
        expected: String,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl IndexError {
    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}
