use anyhow::Result;
use plinth_install::{ErrorKind, InstallOptions, Installer, install_batch};
use tracing::{error, info};

use super::info::caveats_block;
use crate::env::PlinthEnv;
use crate::fetch::HttpFetcher;
use crate::logging::TracingHook;

#[derive(Debug, clap::Args)]
pub struct Install {
    /// Plugins to install.
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,

    /// Install from the plugin's head instead of its pinned release.
    #[arg(long)]
    pub head: bool,
}

impl Install {
    pub fn run(self, env: &PlinthEnv) -> Result<bool> {
        let target = env.target()?;
        let mut options = InstallOptions::new().head(self.head);
        if env.config().bin_links {
            options = options.bin_dir(env.bin_dir());
        }
        let installer = Installer::new(env.store(), HttpFetcher::new()?)
            .with_options(options)
            .with_hook(TracingHook);

        info!(%target, "installing {} plugin(s)", self.names.len());
        let report = install_batch(&installer, &env.index(), &self.names, &target);

        for (name, result) in &report.results {
            match result {
                Ok(outcome) => {
                    match (&outcome.previous, outcome.reinstalled) {
                        (_, true) => println!("Reinstalled {name} {}", outcome.version),
                        (Some(previous), false) => {
                            println!("Upgraded {name} {previous} -> {}", outcome.version)
                        }
                        (None, false) => println!("Installed {name} {}", outcome.version),
                    }
                    if let Some(caveats) = &outcome.caveats {
                        println!("{}", caveats_block(caveats));
                    }
                }
                Err(e) if e.kind() == ErrorKind::NoMatch => {
                    error!("{name} is not available for {target}")
                }
                Err(e) => error!("{e}"),
            }
        }
        Ok(report.is_success())
    }
}
