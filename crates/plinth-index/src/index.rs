use std::io;
use std::path::{Path, PathBuf};

use crate::{IndexError, Manifest, validate_name};

/// A local checkout of a plugin index: one `plugins/<name>.toml` per plugin.
#[derive(Debug, Clone)]
pub struct Index {
    root: PathBuf,
}

impl Index {
    const PLUGINS_DIR: &'static str = "plugins";
    const EXTENSION: &'static str = "toml";

    pub fn open(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    pub fn plugins_dir(&self) -> PathBuf { self.root.join(Self::PLUGINS_DIR) }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.plugins_dir()
            .join(format!("{name}.{}", Self::EXTENSION))
    }

    pub fn load(&self, name: &str) -> Result<Manifest, IndexError> {
        validate_name(name)?;
        let path = self.manifest_path(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(IndexError::NotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(source) => return Err(IndexError::Io { path, source }),
        };
        parse_manifest(&path, &content, name)
    }

    /// Every manifest in the index, sorted by plugin name.
    pub fn load_all(&self) -> Result<Vec<Manifest>, IndexError> {
        let dir = self.plugins_dir();
        let entries = std::fs::read_dir(&dir).map_err(|source| IndexError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut manifests = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IndexError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(Self::EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|source| IndexError::Io {
                path: path.clone(),
                source,
            })?;
            manifests.push(parse_manifest(&path, &content, stem)?);
        }

        manifests.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(manifests)
    }
}

fn parse_manifest(path: &Path, content: &str, expected: &str) -> Result<Manifest, IndexError> {
    let manifest = Manifest::from_toml_str(content).map_err(|source| IndexError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if manifest.name() != expected {
        return Err(IndexError::NameMismatch {
            path:     path.to_path_buf(),
            declared: manifest.name().to_string(),
            expected: expected.to_string(),
        });
    }
    Ok(manifest)
}
