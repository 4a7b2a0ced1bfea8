use anyhow::Result;
use plinth_install::{Uninstaller, uninstall_batch};
use tracing::error;

use crate::env::PlinthEnv;
use crate::logging::TracingHook;

#[derive(Debug, clap::Args)]
pub struct Uninstall {
    /// Plugins to remove.
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,
}

impl Uninstall {
    pub fn run(self, env: &PlinthEnv) -> Result<bool> {
        let mut uninstaller = Uninstaller::new(env.store()).with_hook(TracingHook);
        if env.config().bin_links {
            uninstaller = uninstaller.with_bin_dir(env.bin_dir());
        }

        let report = uninstall_batch(&uninstaller, &self.names);
        for (name, result) in &report.results {
            match result {
                Ok(_) => println!("Uninstalled {name}"),
                Err(e) if e.is_not_installed() => error!("{name} is not installed"),
                Err(e) => error!("{e}"),
            }
        }
        Ok(report.is_success())
    }
}
