//! plinth: a plugin manager that installs the right build of a plugin for
//! this machine and swaps versions atomically.

mod cli;
mod env;
mod fetch;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::cli::{Cli, Command};
use crate::env::{Config, PlinthEnv};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` means the command ran but at least one item failed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let env = PlinthEnv::new(Config::load(cli.config.as_deref())?);

    match cli.command {
        Command::Install(cmd) => cmd.run(&env),
        Command::Uninstall(cmd) => cmd.run(&env),
        Command::Info(cmd) => cmd.run(&env),
        Command::List(cmd) => cmd.run(&env),
    }
}
