use std::path::PathBuf;

use chrono::Utc;
use plinth_index::{Manifest, ManifestError, PlatformArtifact, Source, Target, select_platform};
use plinth_store::{InstallationStore, Receipt, SourceKind};
use plinth_verify::{Sha256Digest, hash_file};

use crate::hooks::Tracker;
use crate::{Failure, Fetcher, InstallError, InstallHook, NoopHook, Phase, Warning, links};

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Install from the artifact's `head` instead of its pinned `uri`.
    pub head:    bool,
    /// Where to link the plugin's `bin`. No links are made when unset.
    pub bin_dir: Option<PathBuf>,
}

impl InstallOptions {
    pub fn new() -> Self { Self::default() }

    pub fn head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    pub fn bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(dir.into());
        self
    }
}

#[derive(Debug)]
pub struct InstallOutcome {
    pub name:        String,
    pub version:     String,
    /// Version that was current before this install.
    pub previous:    Option<String>,
    /// The same version was already current; only the receipt was rewritten.
    pub reinstalled: bool,
    pub caveats:     Option<String>,
    pub warnings:    Vec<Warning>,
}

impl InstallOutcome {
    pub fn is_upgrade(&self) -> bool {
        self.previous
            .as_deref()
            .is_some_and(|previous| previous != self.version)
    }
}

const HEAD_PREFIX: &str = "head-";
const HEAD_DIGEST_LEN: usize = 12;
const FETCHED: &str = "fetched";
const UNPACKED: &str = "unpacked";

/// Version identifier for a head install: the same snapshot always maps to
/// the same directory.
pub(crate) fn head_version(digest: &Sha256Digest) -> String {
    let hex = digest.to_string();
    format!("{HEAD_PREFIX}{}", &hex[..HEAD_DIGEST_LEN])
}

/// Installs plugins into an [`InstallationStore`].
pub struct Installer<F> {
    store:   InstallationStore,
    fetcher: F,
    options: InstallOptions,
    hook:    Box<dyn InstallHook>,
}

impl<F: Fetcher> Installer<F> {
    pub fn new(store: InstallationStore, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            options: InstallOptions::default(),
            hook: Box::new(NoopHook),
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hook<H: InstallHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn store(&self) -> &InstallationStore { &self.store }

    pub fn options(&self) -> &InstallOptions { &self.options }

    /// Install the artifact of `manifest` that matches `target` and make it
    /// the current version.
    ///
    /// Until the swap, the previously current version (if any) stays in
    /// effect; an error returned before [`Phase::Swapping`] means nothing
    /// visible changed.
    pub fn install(&self, manifest: &Manifest, target: &Target) -> Result<InstallOutcome, InstallError> {
        let name = manifest.name();
        let store = &self.store;
        let mut tracker = Tracker::start(name, self.hook.as_ref());

        let artifact = select_platform(manifest, target)
            .map_err(|e| tracker.fail(e))?
            .ok_or_else(|| {
                tracker.fail(Failure::NoMatch {
                    target: target.clone(),
                })
            })?;
        let source = artifact
            .source(self.options.head)
            .map_err(|problem| tracker.fail(artifact_error(manifest, artifact, problem)))?;
        let previous = store.current_version(name).map_err(|e| tracker.fail(e))?;

        tracker.enter(Phase::Staging);
        let scratch = store.stage(name).map_err(|e| tracker.fail(e))?;
        let fetched = scratch.path().join(FETCHED);
        self.fetcher
            .fetch(source.uri(), &fetched)
            .map_err(|source_err| {
                tracker.fail(Failure::Fetch {
                    uri:    source.uri().to_string(),
                    source: source_err,
                })
            })?;
        let digest = hash_file(&fetched).map_err(|e| tracker.fail(e))?;

        // Nothing is unpacked until the download matches its checksum.
        tracker.enter(Phase::Verifying);
        let version = match source {
            Source::Archive { sha256, .. } => {
                let expected: Sha256Digest = sha256.parse().map_err(|e| tracker.fail(e))?;
                expected.check(&digest).map_err(|e| tracker.fail(e))?;
                manifest.version().to_string()
            }
            Source::Head { .. } => head_version(&digest),
        };

        let unpacked = scratch.path().join(UNPACKED);
        plinth_archive::unpack(&fetched, &unpacked, &raw_name(artifact, &source, name))
            .map_err(|e| tracker.fail(e))?;
        let tree = store.stage(name).map_err(|e| tracker.fail(e))?;
        plinth_archive::relocate(&unpacked, tree.path(), &artifact.files).map_err(|e| tracker.fail(e))?;
        drop(scratch);

        let version_dir = store.version_dir(name, &version);
        let was_current = previous.as_deref() == Some(version.as_str());
        let reinstalled = was_current && version_dir.is_dir();
        if reinstalled {
            drop(tree);
        } else {
            if !was_current && version_dir.exists() {
                // Unreferenced leftover of an interrupted install or uninstall.
                store
                    .remove_version(name, &version)
                    .map_err(|e| tracker.fail(e))?;
            }
            store
                .commit_version(tree, name, &version)
                .map_err(|e| tracker.fail(e))?;
        }

        tracker.enter(Phase::Swapping);
        if !reinstalled {
            store.set_current(name, &version).map_err(|e| tracker.fail(e))?;
        }

        tracker.enter(Phase::Cleanup);
        let mut warnings = Vec::new();
        if let (Some(bin_dir), Some(bin)) = (&self.options.bin_dir, &artifact.bin) {
            if let Err(e) = links::link_bin(bin_dir, store, name, bin) {
                tracker.warn(e, &mut warnings);
            }
        }
        match store.version_dirs(name) {
            Ok(versions) => {
                for old in versions.iter().filter(|v| **v != version) {
                    if let Err(e) = store.remove_version(name, old) {
                        tracker.warn(e, &mut warnings);
                    }
                }
            }
            Err(e) => tracker.warn(e, &mut warnings),
        }

        tracker.enter(Phase::Done);
        let receipt = Receipt {
            name: name.to_string(),
            version: version.clone(),
            source: if source.is_head() {
                SourceKind::Head
            } else {
                SourceKind::Archive
            },
            uri: source.uri().to_string(),
            sha256: digest.to_string(),
            target: target.clone(),
            platform: artifact.clone(),
            manifest: manifest.clone(),
            installed_at: Utc::now(),
        };
        store.write_receipt(&receipt).map_err(|e| tracker.fail(e))?;

        Ok(InstallOutcome {
            name: name.to_string(),
            version,
            previous,
            reinstalled,
            caveats: manifest.caveats().map(str::to_string),
            warnings,
        })
    }
}

fn artifact_error(
    manifest: &Manifest,
    artifact: &PlatformArtifact,
    problem: plinth_index::ArtifactProblem,
) -> ManifestError {
    let index = manifest
        .platforms()
        .iter()
        .position(|p| std::ptr::eq(p, artifact))
        .unwrap_or_default();
    ManifestError::Artifact {
        name: manifest.name().to_string(),
        index,
        problem,
    }
}

/// File name for an artifact that is not an archive: the declared `bin`, else
/// the last URI segment, else the plugin name.
fn raw_name(artifact: &PlatformArtifact, source: &Source<'_>, plugin: &str) -> String {
    if let Some(bin) = artifact.bin.as_deref().filter(|b| !b.trim().is_empty()) {
        return bin.to_string();
    }
    source
        .uri()
        .split(['?', '#'])
        .next()
        .and_then(|uri| uri.rsplit('/').next())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or(plugin)
        .to_string()
}
