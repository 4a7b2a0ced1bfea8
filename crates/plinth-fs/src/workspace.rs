use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result, primitives};

/// A scratch directory that becomes visible under its final name in one
/// rename, or not at all.
///
/// Dropping a workspace that was never published removes it together with
/// whatever was written into it.
#[derive(Debug)]
pub struct Workspace {
    dir:       PathBuf,
    published: bool,
}

impl Workspace {
    /// Create a fresh `<parent>/<label>-<uuid>` directory, creating `parent`
    /// if needed.
    pub fn new_in(parent: impl AsRef<Path>, label: &str) -> Result<Self> {
        let dir = parent
            .as_ref()
            .join(format!("{label}-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).map_err(|source| Error::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            published: false,
        })
    }

    pub fn path(&self) -> &Path { &self.dir }

    /// Rename the workspace to `dest`. Missing parents of `dest` are created;
    /// `dest` itself must be absent or an empty directory.
    pub fn publish(mut self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        primitives::replace_dir(&self.dir, dest)?;
        self.published = true;
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.published {
            let _ = primitives::remove_dir_all(&self.dir);
        }
    }
}
