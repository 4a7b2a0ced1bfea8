use crate::{Error, Result};
use std::path::Path;

/// Point `link` at `target`, replacing any existing link in one step.
///
/// A fresh link is created under a temporary sibling name and renamed over
/// `link`; `rename(2)` replaces the old entry atomically, so there is no
/// instant at which `link` is missing.
pub fn atomic_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();
    let tmp_link = super::temp_sibling(link);

    std::os::unix::fs::symlink(target, &tmp_link).map_err(|e| Error::Symlink {
        target: target.to_path_buf(),
        link:   tmp_link.clone(),
        source: e,
    })?;

    std::fs::rename(&tmp_link, link).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_link);
        Error::Symlink {
            target: target.to_path_buf(),
            link:   link.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_symlink() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");

        std::fs::write(&target, "data").unwrap();
        atomic_symlink(&target, &link).unwrap();

        assert!(link.is_symlink());
        assert_eq!(std::fs::read_to_string(link).unwrap(), "data");
    }

    #[test]
    fn test_atomic_symlink_repoints_existing_link() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("1.0.0")).unwrap();
        std::fs::create_dir(dir.path().join("2.0.0")).unwrap();
        let link = dir.path().join("current");

        atomic_symlink("1.0.0", &link).unwrap();
        atomic_symlink("2.0.0", &link).unwrap();

        assert_eq!(std::fs::read_link(&link).unwrap(), Path::new("2.0.0"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
