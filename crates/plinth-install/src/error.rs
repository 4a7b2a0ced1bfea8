use std::fmt;
use std::path::Path;

use plinth_index::{IndexError, ManifestError, Target};
use plinth_verify::VerificationError;

use crate::{FetchError, Phase};

/// Coarse classification of a failure, for callers that decide what to do
/// next (fix the manifest, retry, ignore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed manifest data; retrying will not help.
    ManifestInvalid,
    /// No platform artifact matches the target.
    NoMatch,
    /// Downloaded content does not match its checksum. Staged content has
    /// been discarded; retrying re-downloads.
    IntegrityFailure,
    /// A filesystem or transfer operation failed.
    IoFailure,
    /// Nothing is installed under that name.
    NotInstalled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::ManifestInvalid => "invalid manifest",
            ErrorKind::NoMatch => "no matching platform",
            ErrorKind::IntegrityFailure => "integrity failure",
            ErrorKind::IoFailure => "i/o failure",
            ErrorKind::NotInstalled => "not installed",
        })
    }
}

/// The underlying cause of an install or uninstall failure.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("no platform artifact matches {target}")]
    NoMatch { target: Target },

    #[error("failed to fetch '{uri}': {source}")]
    Fetch { uri: String, source: FetchError },

    #[error(transparent)]
    Verify(#[from] VerificationError),

    #[error(transparent)]
    Archive(#[from] plinth_archive::Error),

    #[error(transparent)]
    Store(#[from] plinth_store::Error),

    #[error(transparent)]
    Fs(#[from] plinth_fs::Error),

    #[error("plugin is not installed")]
    NotInstalled,
}

impl Failure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Failure::Manifest(_) | Failure::Index(_) => ErrorKind::ManifestInvalid,
            Failure::NoMatch { .. } => ErrorKind::NoMatch,
            Failure::Verify(VerificationError::Mismatch { .. }) => ErrorKind::IntegrityFailure,
            Failure::Verify(VerificationError::InvalidDigest(_)) => ErrorKind::ManifestInvalid,
            Failure::Archive(e) if e.is_manifest_problem() => ErrorKind::ManifestInvalid,
            Failure::Verify(_)
            | Failure::Archive(_)
            | Failure::Fetch { .. }
            | Failure::Store(_)
            | Failure::Fs(_) => ErrorKind::IoFailure,
            Failure::NotInstalled => ErrorKind::NotInstalled,
        }
    }

    /// The offending path, when the failure is about one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Failure::Store(e) => e.path(),
            Failure::Fs(e) => Some(e.path()),
            Failure::Verify(VerificationError::Read { path, .. }) => Some(path),
            Failure::Archive(
                plinth_archive::Error::Extract { path, .. }
                | plinth_archive::Error::Corrupted { path, .. },
            ) => Some(path),
            _ => None,
        }
    }
}

/// A failure annotated with the plugin it concerns and the phase it stopped
/// in.
#[derive(Debug, thiserror::Error)]
#[error("{plugin}: {phase}: {failure}")]
pub struct InstallError {
    pub plugin:  String,
    pub phase:   Phase,
    #[source]
    pub failure: Failure,
}

impl InstallError {
    pub fn kind(&self) -> ErrorKind { self.failure.kind() }

    pub fn is_not_installed(&self) -> bool { self.kind() == ErrorKind::NotInstalled }
}

/// A problem that did not stop the operation, e.g. an old version directory
/// that could not be removed after the new one went live.
#[derive(Debug, thiserror::Error)]
#[error("{phase}: {failure}")]
pub struct Warning {
    pub phase:   Phase,
    #[source]
    pub failure: Failure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let mismatch = Failure::Verify(VerificationError::Mismatch {
            expected: "aa".into(),
            actual:   "bb".into(),
        });
        assert_eq!(mismatch.kind(), ErrorKind::IntegrityFailure);

        let rule = Failure::Archive(plinth_archive::Error::NoMatch { from: "bin/*".into() });
        assert_eq!(rule.kind(), ErrorKind::ManifestInvalid);

        assert_eq!(Failure::Manifest(ManifestError::EmptyName).kind(), ErrorKind::ManifestInvalid);
        assert_eq!(Failure::NotInstalled.kind(), ErrorKind::NotInstalled);
    }

    #[test]
    fn test_display_names_plugin_and_phase() {
        let err = InstallError {
            plugin:  "foo".into(),
            phase:   Phase::Resolving,
            failure: Failure::NotInstalled,
        };
        assert_eq!(err.to_string(), "foo: resolving: plugin is not installed");
        assert!(err.is_not_installed());
    }
}
