pub mod atomic_write;
pub mod remove;
pub mod replace_dir;
#[cfg(unix)]
pub mod symlink;

pub use atomic_write::{atomic_read, atomic_write};
pub use remove::remove_dir_all;
pub use replace_dir::replace_dir;
#[cfg(unix)]
pub use symlink::atomic_symlink;

use std::path::{Path, PathBuf};

/// Sibling path used for the not-yet-published half of a rename.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    let tmp = format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple());
    match path.parent() {
        Some(parent) => parent.join(tmp),
        None => PathBuf::from(tmp),
    }
}
