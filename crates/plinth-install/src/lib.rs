//! plinth-install: turns a selected platform artifact into the active version
//! of a plugin, and takes it away again.
//!
//! An install walks a fixed sequence of [`Phase`]s. Everything before
//! [`Phase::Swapping`] happens in a private staging area, so an abort (or a
//! crash) leaves the previously active version untouched. The swap itself is
//! a single atomic repoint of the store's `current` entry; anything that
//! fails after it is reported as a [`Warning`] and never rolled back.
//!
//! Nothing in this crate logs. Callers observe progress through an
//! [`InstallHook`] and the returned outcomes.

mod batch;
mod error;
mod fetch;
mod hooks;
mod installer;
mod links;
mod uninstaller;

pub use batch::{BatchReport, install_batch, uninstall_batch};
pub use error::{ErrorKind, Failure, InstallError, Warning};
pub use fetch::{FetchError, Fetcher, LocalFetcher};
pub use hooks::{InstallHook, NoopHook, Phase};
pub use installer::{InstallOptions, InstallOutcome, Installer};
pub use uninstaller::{UninstallOutcome, Uninstaller};

use plinth_index::{Manifest, PlatformArtifact, Target, select_platform};

/// Read-only lookup of the artifact an install on `target` would use.
///
/// `Ok(None)` means the plugin is not available for that platform.
pub fn matching_platform<'m>(
    manifest: &'m Manifest,
    target: &Target,
) -> Result<Option<&'m PlatformArtifact>, InstallError> {
    select_platform(manifest, target).map_err(|e| InstallError {
        plugin:  manifest.name().to_string(),
        phase:   Phase::Resolving,
        failure: e.into(),
    })
}
