use std::path::Path;

use crate::{Error, Result};

#[cfg(not(unix))]
const ATTEMPTS: u32 = 5;
#[cfg(not(unix))]
const BACKOFF: std::time::Duration = std::time::Duration::from_millis(100);

/// Rename the directory `src` to `dest` on the same filesystem.
///
/// `dest` must be absent or an empty directory. On non-Unix hosts the rename
/// is retried with a growing delay while scanners hold the fresh tree open.
pub fn replace_dir(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    rename(src, dest).map_err(|source| Error::ReplaceDir {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn rename(src: &Path, dest: &Path) -> std::io::Result<()> { std::fs::rename(src, dest) }

#[cfg(not(unix))]
fn rename(src: &Path, dest: &Path) -> std::io::Result<()> {
    let mut attempt = 1;
    loop {
        match std::fs::rename(src, dest) {
            Err(_) if attempt < ATTEMPTS => {
                std::thread::sleep(BACKOFF * attempt);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_moves_into_empty_destination() {
        let dir = tempdir().unwrap();
        let (src, dest) = (dir.path().join("staged"), dir.path().join("2.1.0"));
        fs::create_dir_all(src.join("bin")).unwrap();
        fs::create_dir(&dest).unwrap();

        replace_dir(&src, &dest).unwrap();
        assert!(!src.exists());
        assert!(dest.join("bin").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_occupied_destination_is_reported() {
        let dir = tempdir().unwrap();
        let (src, dest) = (dir.path().join("staged"), dir.path().join("2.1.0"));
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("plugin"), "old").unwrap();

        let err = replace_dir(&src, &dest).unwrap_err();
        assert_eq!(err.path(), dest.as_path());
        assert!(src.is_dir());
    }
}
