use std::path::PathBuf;

use plinth_index::validate_name;
use plinth_store::InstallationStore;

use crate::hooks::Tracker;
use crate::{Failure, InstallError, InstallHook, NoopHook, Phase, Warning, links};

#[derive(Debug)]
pub struct UninstallOutcome {
    pub name:     String,
    /// Version `current` pointed to, if it still existed.
    pub version:  Option<String>,
    pub warnings: Vec<Warning>,
}

/// Removes installed plugins from an [`InstallationStore`].
pub struct Uninstaller {
    store:   InstallationStore,
    bin_dir: Option<PathBuf>,
    hook:    Box<dyn InstallHook>,
}

impl Uninstaller {
    pub fn new(store: InstallationStore) -> Self {
        Self {
            store,
            bin_dir: None,
            hook: Box::new(NoopHook),
        }
    }

    /// Also remove links this plugin owns in `dir`.
    pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(dir.into());
        self
    }

    pub fn with_hook<H: InstallHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn store(&self) -> &InstallationStore { &self.store }

    /// Remove plugin `name`.
    ///
    /// The receipt and the `current` indirection go first, so once this
    /// returns past [`Phase::Swapping`] the plugin no longer looks installed
    /// even if deleting its version directories fails. Calling it again
    /// finishes the cleanup. A name with nothing recorded at all fails with
    /// a not-installed error without touching the disk.
    pub fn uninstall(&self, name: &str) -> Result<UninstallOutcome, InstallError> {
        let store = &self.store;
        let mut tracker = Tracker::start(name, self.hook.as_ref());

        validate_name(name).map_err(|e| tracker.fail(e))?;
        let version = store.current_version(name).map_err(|e| tracker.fail(e))?;
        if version.is_none() && !store.has_residue(name).map_err(|e| tracker.fail(e))? {
            return Err(tracker.fail(Failure::NotInstalled));
        }
        let mut warnings = Vec::new();
        // Needed after the receipt is gone, to find the bin link.
        let receipt = match store.read_receipt(name) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracker.warn(e, &mut warnings);
                None
            }
        };

        tracker.enter(Phase::Swapping);
        store.delete_receipt(name).map_err(|e| tracker.fail(e))?;
        store.remove_current(name).map_err(|e| tracker.fail(e))?;

        tracker.enter(Phase::Cleanup);
        if let (Some(bin_dir), Some(bin)) = (&self.bin_dir, receipt.and_then(|r| r.platform.bin)) {
            if let Err(e) = links::unlink_bin(bin_dir, store, name, &bin) {
                tracker.warn(e, &mut warnings);
            }
        }

        let mut first_error = None;
        for dir in store.version_dirs(name).map_err(|e| tracker.fail(e))? {
            if let Err(e) = store.remove_version(name, &dir) {
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(tracker.fail(e));
        }
        if let Err(e) = store.prune_plugin_dir(name) {
            tracker.warn(e, &mut warnings);
        }

        tracker.enter(Phase::Done);
        Ok(UninstallOutcome {
            name: name.to_string(),
            version,
            warnings,
        })
    }
}
