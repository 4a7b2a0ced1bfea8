use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::sanitize::{normalize_path, sanitize_path};
use crate::{Error, Format, Result, detect};

fn corrupted(path: &Path, reason: impl ToString) -> Error {
    Error::Corrupted {
        path:   path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn extract_err(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |source| Error::Extract {
        path: path.to_path_buf(),
        source,
    }
}

/// Materialise `artifact` under `dest`.
///
/// Archives are extracted in place; a file that is not an archive is copied
/// to `dest/<raw_name>` and made executable.
pub fn unpack(artifact: &Path, dest: &Path, raw_name: &str) -> Result<Format> {
    let format = detect(artifact)?;
    fs::create_dir_all(dest).map_err(extract_err(dest))?;

    match format {
        Format::Zip => unpack_zip(artifact, dest)?,
        Format::Tar => {
            let file = File::open(artifact).map_err(extract_err(artifact))?;
            unpack_tar(file, artifact, dest)?
        }
        Format::TarGz => {
            let file = File::open(artifact).map_err(extract_err(artifact))?;
            unpack_tar(GzDecoder::new(file), artifact, dest)?
        }
        Format::Raw => place_raw(artifact, dest, raw_name)?,
    }
    Ok(format)
}

fn unpack_zip(artifact: &Path, dest: &Path) -> Result<()> {
    let file = File::open(artifact).map_err(extract_err(artifact))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| corrupted(artifact, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| corrupted(artifact, e))?;
        let target = sanitize_path(Path::new(entry.name()), dest)?;

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(extract_err(&target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(extract_err(parent))?;
        }

        let mut out = File::create(&target).map_err(extract_err(&target))?;
        io::copy(&mut entry, &mut out).map_err(extract_err(&target))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))
                .map_err(extract_err(&target))?;
        }
    }
    Ok(())
}

fn unpack_tar<R: Read>(reader: R, artifact: &Path, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_overwrite(true);
    let entries = archive.entries().map_err(|e| corrupted(artifact, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| corrupted(artifact, e))?;
        let path: PathBuf = entry
            .path()
            .map_err(|e| corrupted(artifact, e))?
            .into_owned();
        let target = sanitize_path(&path, dest)?;

        let kind = entry.header().entry_type();
        if kind.is_symlink() || kind.is_hard_link() {
            let link = entry
                .link_name()
                .map_err(|e| corrupted(artifact, e))?
                .ok_or_else(|| corrupted(artifact, format!("link '{}' has no target", path.display())))?
                .into_owned();
            check_link(&path, &link, kind.is_hard_link())?;
        }

        let unpacked = entry.unpack_in(dest).map_err(extract_err(&target))?;
        if !unpacked {
            return Err(Error::ZipSlip {
                entry:    path,
                resolved: target,
            });
        }
    }
    Ok(())
}

/// Symlink targets resolve against the link's directory, hard link targets
/// against the archive root; either way they must stay inside.
fn check_link(link: &Path, target: &Path, hard: bool) -> Result<()> {
    let escape = || Error::LinkEscape {
        link:   link.to_path_buf(),
        target: target.to_path_buf(),
    };
    if target.has_root() {
        return Err(escape());
    }
    let resolved = if hard {
        target.to_path_buf()
    } else {
        link.parent().unwrap_or(Path::new("")).join(target)
    };
    normalize_path(&resolved).map(|_| ()).ok_or_else(escape)
}

fn place_raw(artifact: &Path, dest: &Path, raw_name: &str) -> Result<()> {
    let target = sanitize_path(Path::new(raw_name), dest)?;
    if target == dest {
        return Err(Error::ZipSlip {
            entry:    PathBuf::from(raw_name),
            resolved: target,
        });
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(extract_err(parent))?;
    }
    fs::copy(artifact, &target).map_err(extract_err(&target))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755))
            .map_err(extract_err(&target))?;
    }
    Ok(())
}
