use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plinth_fs::{Workspace, atomic_read, atomic_write};

use crate::{Error, Receipt, Result};

#[derive(Debug, Clone)]
pub struct InstallationStore {
    root: PathBuf,
}

impl InstallationStore {
    pub const CURRENT: &'static str = "current";
    pub const RECEIPT: &'static str = "receipt";
    pub const STAGING: &'static str = ".staging";

    /// A store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    pub fn plugin_dir(&self, name: &str) -> PathBuf { self.root.join(name) }

    pub fn version_dir(&self, name: &str, version: &str) -> PathBuf {
        self.plugin_dir(name).join(version)
    }

    pub fn current_path(&self, name: &str) -> PathBuf { self.plugin_dir(name).join(Self::CURRENT) }

    pub fn receipt_path(&self, name: &str) -> PathBuf { self.plugin_dir(name).join(Self::RECEIPT) }

    pub fn staging_dir(&self) -> PathBuf { self.root.join(Self::STAGING) }

    /// Open a private build area for `name`. It is deleted when dropped
    /// unless published with [`InstallationStore::commit_version`].
    pub fn stage(&self, name: &str) -> Result<Workspace> {
        Ok(Workspace::new_in(self.staging_dir(), name)?)
    }

    /// Publish a staged tree as `<name>/<version>`. The version directory must
    /// not exist yet.
    pub fn commit_version(&self, staged: Workspace, name: &str, version: &str) -> Result<PathBuf> {
        let dest = self.version_dir(name, version);
        if fs::symlink_metadata(&dest).is_ok() {
            return Err(Error::VersionExists { path: dest });
        }
        staged.publish(&dest)?;
        Ok(dest)
    }

    /// The version `current` points to, or `None` when the plugin is not
    /// installed.
    pub fn current_version(&self, name: &str) -> Result<Option<String>> {
        let path = self.current_path(name);
        match read_pointer(&path) {
            Ok(version) => Ok(Some(version)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(plinth_fs::Error::Read { path, source }.into()),
        }
    }

    /// Repoint `current` at an existing version directory in one step.
    pub fn set_current(&self, name: &str, version: &str) -> Result<()> {
        let dir = self.version_dir(name, version);
        if !dir.is_dir() {
            return Err(Error::MissingVersion {
                name:    name.to_string(),
                version: version.to_string(),
                path:    dir,
            });
        }
        write_pointer(&self.current_path(name), version)
    }

    /// Remove the `current` indirection. Returns whether it existed.
    pub fn remove_current(&self, name: &str) -> Result<bool> {
        remove_file(&self.current_path(name))
    }

    /// Delete a version directory tree. The active version cannot be removed;
    /// repoint or remove `current` first.
    pub fn remove_version(&self, name: &str, version: &str) -> Result<()> {
        if self.current_version(name)?.as_deref() == Some(version) {
            return Err(Error::VersionInUse {
                name:    name.to_string(),
                version: version.to_string(),
            });
        }
        plinth_fs::remove_dir_all(self.version_dir(name, version))?;
        Ok(())
    }

    /// Version directories present for `name`, sorted.
    pub fn version_dirs(&self, name: &str) -> Result<Vec<String>> {
        let mut versions: Vec<String> = list_dir(&self.plugin_dir(name))?
            .into_iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(entry, _)| entry)
            .filter(|entry| !entry.starts_with('.') && entry != Self::CURRENT && entry != Self::RECEIPT)
            .collect();
        versions.sort();
        Ok(versions)
    }

    pub fn write_receipt(&self, receipt: &Receipt) -> Result<()> {
        let json = serde_json::to_vec_pretty(receipt).map_err(|source| Error::EncodeReceipt {
            name: receipt.name.clone(),
            source,
        })?;
        let plugin_dir = self.plugin_dir(&receipt.name);
        fs::create_dir_all(&plugin_dir).map_err(|source| plinth_fs::Error::Write {
            path: plugin_dir,
            source,
        })?;
        atomic_write(self.receipt_path(&receipt.name), &json)?;
        Ok(())
    }

    /// The receipt for `name`, or `None` when there is none.
    pub fn read_receipt(&self, name: &str) -> Result<Option<Receipt>> {
        let path = self.receipt_path(name);
        let bytes = match atomic_read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| Error::MalformedReceipt { path, source })
    }

    /// Returns whether a receipt existed.
    pub fn delete_receipt(&self, name: &str) -> Result<bool> { remove_file(&self.receipt_path(name)) }

    /// Remove `<store>/<name>` if nothing is left in it. Returns whether it
    /// was removed.
    pub fn prune_plugin_dir(&self, name: &str) -> Result<bool> {
        let dir = self.plugin_dir(name);
        if !list_dir(&dir)?.is_empty() {
            return Ok(false);
        }
        match fs::remove_dir(&dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(plinth_fs::Error::Remove { path: dir, source }.into()),
        }
    }

    /// Whether anything at all is recorded for `name`.
    pub fn has_residue(&self, name: &str) -> Result<bool> {
        Ok(fs::symlink_metadata(self.current_path(name)).is_ok()
            || self.receipt_path(name).exists()
            || !self.version_dirs(name)?.is_empty())
    }

    /// Receipts of every installed plugin, sorted by name. Plugin directories
    /// without a receipt are skipped.
    pub fn installed(&self) -> Result<Vec<Receipt>> {
        let mut receipts = Vec::new();
        for (entry, is_dir) in list_dir(&self.root)? {
            if !is_dir || entry.starts_with('.') {
                continue;
            }
            if let Some(receipt) = self.read_receipt(&entry)? {
                receipts.push(receipt);
            }
        }
        receipts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(receipts)
    }
}

/// Entry names of `dir` with whether each is a real directory (symlinks are
/// not followed). A missing directory lists as empty.
fn list_dir(dir: &Path) -> Result<Vec<(String, bool)>> {
    let list_err = |source| Error::List {
        path: dir.to_path_buf(),
        source,
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(list_err(e)),
    };
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(list_err)?;
        let is_dir = entry.file_type().map_err(list_err)?.is_dir();
        out.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
    }
    Ok(out)
}

fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(plinth_fs::Error::Remove {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}

/// `current` is a relative symlink on Unix so the store can be moved.
#[cfg(unix)]
fn read_pointer(path: &Path) -> io::Result<String> {
    let target = fs::read_link(path)?;
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "current points nowhere"))
}

#[cfg(unix)]
fn write_pointer(path: &Path, version: &str) -> Result<()> {
    plinth_fs::atomic_symlink(version, path)?;
    Ok(())
}

/// Elsewhere `current` is a small file holding the version name.
#[cfg(not(unix))]
fn read_pointer(path: &Path) -> io::Result<String> {
    let version = fs::read_to_string(path)?.trim().to_string();
    if version.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "current is empty"));
    }
    Ok(version)
}

#[cfg(not(unix))]
fn write_pointer(path: &Path, version: &str) -> Result<()> {
    atomic_write(path, version.as_bytes())?;
    Ok(())
}
