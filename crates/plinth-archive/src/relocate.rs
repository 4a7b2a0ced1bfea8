use std::fs;
use std::path::{Path, PathBuf};

use plinth_index::FileRule;

use crate::sanitize::normalize_path;
use crate::{Error, Result};

/// Move the unpacked tree at `src` into the install tree at `dest`.
///
/// Without rules everything under `src` is moved as is. Otherwise each
/// rule's `from` selects entries (`path`, `dir/*` or `*`) that are moved into
/// the directory `to`, keeping their names. Rules apply in order.
pub fn relocate(src: &Path, dest: &Path, rules: &[FileRule]) -> Result<()> {
    if rules.is_empty() {
        return move_into(&list_dir(src)?, dest);
    }

    for rule in rules {
        let unsafe_rule = || Error::UnsafeRule {
            from: rule.from.clone(),
            to:   rule.to.clone(),
        };

        let to = relative(&rule.to).ok_or_else(unsafe_rule)?;
        let (dir, all) = match rule.from.trim() {
            "*" => ("", true),
            from => match from.strip_suffix("/*") {
                Some(dir) => (dir, true),
                None => (from, false),
            },
        };
        let base = src.join(relative(dir).ok_or_else(unsafe_rule)?);

        let matched = if all {
            list_dir(&base)?
        } else if fs::symlink_metadata(&base).is_ok() && base != src {
            vec![base]
        } else {
            Vec::new()
        };
        if matched.is_empty() {
            return Err(Error::NoMatch {
                from: rule.from.clone(),
            });
        }

        move_into(&matched, &dest.join(to))?;
    }
    Ok(())
}

fn relative(path: &str) -> Option<PathBuf> {
    let path = Path::new(path.trim());
    if path.has_root() {
        return None;
    }
    normalize_path(path)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| Error::Extract {
        path: dir.to_path_buf(),
        source,
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(read_err(e)),
    };
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    paths.sort();
    Ok(paths)
}

fn move_into(paths: &[PathBuf], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Extract {
        path: dir.to_path_buf(),
        source,
    })?;
    for path in paths {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dir.join(name);
        fs::rename(path, &target).map_err(|source| Error::Extract {
            path: target.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tree() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempdir().unwrap();
        let src = dir.path().join("unpacked");
        let dest = dir.path().join("tree");
        fs::create_dir_all(src.join("foo-v1/bin")).unwrap();
        fs::write(src.join("foo-v1/bin/foo"), "bin").unwrap();
        fs::write(src.join("foo-v1/LICENSE"), "license").unwrap();
        fs::create_dir_all(&dest).unwrap();
        (dir, src, dest)
    }

    #[test]
    fn test_no_rules_moves_everything() {
        let (_dir, src, dest) = tree();
        relocate(&src, &dest, &[]).unwrap();
        assert!(dest.join("foo-v1/bin/foo").is_file());
    }

    #[test]
    fn test_strip_top_level_directory() {
        let (_dir, src, dest) = tree();
        relocate(&src, &dest, &[FileRule::new("foo-v1/*", ".")]).unwrap();
        assert!(dest.join("bin/foo").is_file());
        assert!(dest.join("LICENSE").is_file());
    }

    #[test]
    fn test_single_path_into_subdir() {
        let (_dir, src, dest) = tree();
        relocate(&src, &dest, &[FileRule::new("foo-v1/LICENSE", "doc")]).unwrap();
        assert!(dest.join("doc/LICENSE").is_file());
        assert!(!dest.join("bin").exists());
    }

    #[test]
    fn test_rules_must_match() {
        let (_dir, src, dest) = tree();
        let err = relocate(&src, &dest, &[FileRule::new("missing/*", ".")]).unwrap_err();
        assert!(matches!(err, Error::NoMatch { .. }));
        assert!(err.is_manifest_problem());
    }

    #[test]
    fn test_rules_cannot_escape() {
        let (_dir, src, dest) = tree();
        for rule in [FileRule::new("../*", "."), FileRule::new("*", "../outside")] {
            let err = relocate(&src, &dest, &[rule]).unwrap_err();
            assert!(matches!(err, Error::UnsafeRule { .. }));
        }
    }
}
