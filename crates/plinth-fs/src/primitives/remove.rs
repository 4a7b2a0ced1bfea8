use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Remove a directory tree. A tree that is already gone is not an error.
///
/// When removal stops partway the error carries the number of entries left
/// behind, so callers can report the residue instead of hiding it.
pub fn remove_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => match fs::symlink_metadata(path) {
            Err(_) => Err(Error::Remove {
                path: path.to_path_buf(),
                source,
            }),
            Ok(_) => Err(Error::Residue {
                path: path.to_path_buf(),
                residue: count_entries(path) + 1,
                source,
            }),
        },
    }
}

fn count_entries(path: &Path) -> usize {
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| match entry.file_type() {
            Ok(ty) if ty.is_dir() => 1 + count_entries(&entry.path()),
            _ => 1,
        })
        .sum()
}
