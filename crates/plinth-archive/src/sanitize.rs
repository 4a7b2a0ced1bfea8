use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve `.` and `..` lexically. Returns `None` when `..` would climb
/// above the start of the path.
pub fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Join an archive entry path onto `base`, rejecting anything that would
/// resolve outside of it.
pub fn sanitize_path(entry: &Path, base: &Path) -> Result<PathBuf> {
    let escape = |resolved: PathBuf| Error::ZipSlip {
        entry: entry.to_path_buf(),
        resolved,
    };

    if entry.has_root()
        || entry
            .components()
            .any(|c| matches!(c, Component::Prefix(_)))
    {
        return Err(escape(entry.to_path_buf()));
    }

    let relative = normalize_path(entry).ok_or_else(|| escape(base.join(entry)))?;
    Ok(base.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_nested_paths() {
        let base = Path::new("/stage");
        assert_eq!(
            sanitize_path(Path::new("foo/./bin/../bin/foo"), base).unwrap(),
            PathBuf::from("/stage/foo/bin/foo")
        );
    }

    #[test]
    fn test_sanitize_rejects_escapes() {
        let base = Path::new("/stage");
        assert!(sanitize_path(Path::new("../etc/passwd"), base).is_err());
        assert!(sanitize_path(Path::new("a/../../b"), base).is_err());
        assert!(sanitize_path(Path::new("/etc/passwd"), base).is_err());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/b/../c")), Some(PathBuf::from("a/c")));
        assert_eq!(normalize_path(Path::new("..")), None);
        assert_eq!(normalize_path(Path::new(".")), Some(PathBuf::new()));
    }
}
