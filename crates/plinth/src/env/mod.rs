use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use home::home_dir;
use plinth_index::{Index, Target};
use plinth_store::InstallationStore;
use serde::{Deserialize, Serialize};

const ROOT_DIR: &str = ".plinth";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "PLINTH_";

/// User settings, layered: defaults, `~/.plinth/config.toml`, `--config`,
/// then `PLINTH_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub root:      PathBuf,
    /// Index checkout; `<root>/index` when unset.
    pub index:     Option<PathBuf>,
    /// Overrides for host detection.
    pub os:        Option<String>,
    pub arch:      Option<String>,
    /// Link each plugin's `bin` into `<root>/bin`.
    pub bin_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root:      default_root(),
            index:     None,
            os:        None,
            arch:      None,
            bin_links: true,
        }
    }
}

fn default_root() -> PathBuf {
    home_dir()
        .map(|home| home.join(ROOT_DIR))
        .unwrap_or_else(|| PathBuf::from(ROOT_DIR))
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::figment(&default_root().join(CONFIG_FILE), explicit)
            .extract()
            .context("failed to load configuration")
    }

    /// A missing user file is skipped; a missing explicit file is an error.
    fn figment(user_file: &Path, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_file));
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}

/// Resolved locations and settings for one invocation.
#[derive(Debug, Clone)]
pub struct PlinthEnv {
    config: Config,
}

impl PlinthEnv {
    pub fn new(config: Config) -> Self { Self { config } }

    pub fn config(&self) -> &Config { &self.config }

    pub fn store(&self) -> InstallationStore { InstallationStore::new(self.config.root.join("store")) }

    pub fn bin_dir(&self) -> PathBuf { self.config.root.join("bin") }

    pub fn index(&self) -> Index {
        Index::open(
            self.config
                .index
                .clone()
                .unwrap_or_else(|| self.config.root.join("index")),
        )
    }

    pub fn target(&self) -> Result<Target> {
        Target::host_with(self.config.os.as_deref(), self.config.arch.as_deref())
            .context("invalid os/arch override")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempdir().unwrap();
        let config: Config = Config::figment(&dir.path().join("missing.toml"), None)
            .extract()
            .unwrap();
        assert!(config.bin_links);
        assert!(config.root.ends_with(ROOT_DIR));
    }

    #[test]
    fn test_explicit_file_overrides_user_file() {
        let dir = tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&user, "root = \"/from/user\"\nos = \"darwin\"\n").unwrap();
        std::fs::write(&explicit, "root = \"/from/explicit\"\nbin_links = false\n").unwrap();

        let config: Config = Config::figment(&user, Some(&explicit)).extract().unwrap();
        assert_eq!(config.root, PathBuf::from("/from/explicit"));
        assert_eq!(config.os.as_deref(), Some("darwin"));
        assert!(!config.bin_links);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result: Result<Config, _> =
            Config::figment(&dir.path().join("user.toml"), Some(&dir.path().join("nope.toml"))).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_derived_paths() {
        let env = PlinthEnv::new(Config {
            root: PathBuf::from("/p"),
            os: Some("macos".into()),
            arch: Some("aarch64".into()),
            ..Config::default()
        });
        assert_eq!(env.store().root(), Path::new("/p/store"));
        assert_eq!(env.bin_dir(), PathBuf::from("/p/bin"));
        assert_eq!(env.index().root(), Path::new("/p/index"));
        assert_eq!(env.target().unwrap().to_string(), "darwin/arm64");
    }
}
