use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to link '{link}' -> '{target}': {source}")]
    Symlink {
        target: PathBuf,
        link:   PathBuf,
        source: io::Error,
    },

    #[error("failed to move '{from}' to '{to}': {source}")]
    ReplaceDir {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("partially removed '{path}', {residue} entries remain: {source}")]
    Residue {
        path:    PathBuf,
        residue: usize,
        source:  io::Error,
    },
}

impl Error {
    /// The path the failed operation was acting on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Remove { path, .. }
            | Self::Residue { path, .. } => path,
            Self::Symlink { link, .. } => link,
            Self::ReplaceDir { to, .. } => to,
        }
    }

    pub fn io(&self) -> &io::Error {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Symlink { source, .. }
            | Self::ReplaceDir { source, .. }
            | Self::Remove { source, .. }
            | Self::Residue { source, .. } => source,
        }
    }

    pub fn is_not_found(&self) -> bool { self.io().kind() == io::ErrorKind::NotFound }
}

pub type Result<T> = std::result::Result<T, Error>;
