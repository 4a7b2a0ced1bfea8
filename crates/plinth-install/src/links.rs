//! `<bin_dir>/<bin>` entries pointing through a plugin's `current`.

use std::path::{Path, PathBuf};

use plinth_store::InstallationStore;

fn link_target(store: &InstallationStore, name: &str, bin: &str) -> PathBuf {
    store.current_path(name).join(bin)
}

/// Point `<bin_dir>/<bin>` at the plugin's current tree. The link goes through
/// `current`, so it stays valid across upgrades.
#[cfg(unix)]
pub(crate) fn link_bin(
    bin_dir: &Path,
    store: &InstallationStore,
    name: &str,
    bin: &str,
) -> Result<PathBuf, plinth_fs::Error> {
    std::fs::create_dir_all(bin_dir).map_err(|source| plinth_fs::Error::Write {
        path: bin_dir.to_path_buf(),
        source,
    })?;
    let link = bin_dir.join(bin_name(bin));
    plinth_fs::atomic_symlink(link_target(store, name, bin), &link)?;
    Ok(link)
}

#[cfg(not(unix))]
pub(crate) fn link_bin(
    bin_dir: &Path,
    _store: &InstallationStore,
    _name: &str,
    bin: &str,
) -> Result<PathBuf, plinth_fs::Error> {
    Ok(bin_dir.join(bin_name(bin)))
}

/// Remove the link for `bin` if it still points at this plugin. Returns
/// whether anything was removed.
pub(crate) fn unlink_bin(
    bin_dir: &Path,
    store: &InstallationStore,
    name: &str,
    bin: &str,
) -> Result<bool, plinth_fs::Error> {
    let link = bin_dir.join(bin_name(bin));
    match std::fs::read_link(&link) {
        Ok(target) if target == link_target(store, name, bin) => {}
        _ => return Ok(false),
    }
    std::fs::remove_file(&link).map_err(|source| plinth_fs::Error::Remove { path: link, source })?;
    Ok(true)
}

/// A `bin` may sit in a subdirectory of the tree; the link is named after the
/// file.
fn bin_name(bin: &str) -> &str {
    Path::new(bin)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(bin)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_link_and_unlink() {
        let dir = tempdir().unwrap();
        let store = InstallationStore::new(dir.path().join("store"));
        let bin_dir = dir.path().join("bin");

        let link = link_bin(&bin_dir, &store, "foo", "tools/foo").unwrap();
        assert_eq!(link, bin_dir.join("foo"));
        assert_eq!(
            std::fs::read_link(&link).unwrap(),
            store.current_path("foo").join("tools/foo")
        );

        assert!(!unlink_bin(&bin_dir, &store, "bar", "tools/foo").unwrap());
        assert!(unlink_bin(&bin_dir, &store, "foo", "tools/foo").unwrap());
        assert!(!link.exists());
    }
}
