// plugctl/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use plugctl_common::error::Result;
use plugctl_common::Config;

pub mod info;
pub mod install;
pub mod uninstall;
pub mod upgrade;

use crate::cli::info::Info;
use crate::cli::install::InstallArgs;
use crate::cli::uninstall::Uninstall;
use crate::cli::upgrade::UpgradeArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "plugctl", bin_name = "plugctl")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding installed plugins (overrides PLUGCTL_PLUGINS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub plugins_dir: Option<PathBuf>,

    /// Base URL of the plugin repository (overrides PLUGCTL_REPO)
    #[arg(long, global = true, value_name = "URL")]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Info(Info),
    Install(InstallArgs),
    #[command(visible_alias = "remove")]
    Uninstall(Uninstall),
    Upgrade(UpgradeArgs),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Info(command) => command.run(config).await,
            Self::Install(command) => command.run(config).await,
            Self::Uninstall(command) => command.run(config).await,
            Self::Upgrade(command) => command.run(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn upgrade_takes_one_positional_name() {
        let args = CliArgs::try_parse_from([
            "plugctl",
            "--plugins-dir",
            "/tmp/plugins",
            "upgrade",
            "grafana-clock-panel",
        ])
        .unwrap();
        assert_eq!(args.plugins_dir, Some(PathBuf::from("/tmp/plugins")));
        match args.command {
            Command::Upgrade(upgrade) => assert_eq!(upgrade.name, "grafana-clock-panel"),
            other => panic!("unexpected command {other:?}"),
        }

        assert!(CliArgs::try_parse_from(["plugctl", "upgrade"]).is_err());
        assert!(CliArgs::try_parse_from(["plugctl", "upgrade", "a", "b"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = CliArgs::try_parse_from([
            "plugctl",
            "remove",
            "worldmap",
            "--repo",
            "https://plugins.internal/api",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.repo.as_deref(), Some("https://plugins.internal/api"));
        assert!(matches!(args.command, Command::Uninstall(_)));
    }
}
