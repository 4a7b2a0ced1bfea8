mod info;
mod install;
mod list;
mod uninstall;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub use info::Info;
pub use install::Install;
pub use list::List;
pub use uninstall::Uninstall;

#[derive(Debug, Parser)]
#[command(name = "plinth", version, about)]
pub struct Cli {
    /// Read settings from this file in addition to ~/.plinth/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More output; repeat for more.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install plugins, or upgrade them to the indexed version.
    Install(Install),
    /// Remove installed plugins.
    #[command(visible_alias = "remove")]
    Uninstall(Uninstall),
    /// Show a plugin's download, version and caveats.
    Info(Info),
    /// List installed plugins.
    #[command(visible_alias = "ls")]
    List(List),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() { Cli::command().debug_assert(); }

    #[test]
    fn test_parse_install() {
        let cli = Cli::try_parse_from(["plinth", "-vv", "install", "--head", "foo", "bar"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Install(install) = cli.command else {
            panic!("expected install");
        };
        assert!(install.head);
        assert_eq!(install.names, vec!["foo", "bar"]);
    }

    #[test]
    fn test_remove_alias() {
        let cli = Cli::try_parse_from(["plinth", "remove", "foo", "--config", "/tmp/c.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Uninstall(_)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_names_required() {
        assert!(Cli::try_parse_from(["plinth", "install"]).is_err());
        assert!(Cli::try_parse_from(["plinth", "uninstall"]).is_err());
    }

    #[test]
    fn test_info_without_names_describes_index() {
        let cli = Cli::try_parse_from(["plinth", "info"]).unwrap();
        let Command::Info(info) = cli.command else {
            panic!("expected info");
        };
        assert!(info.names.is_empty());
    }
}
