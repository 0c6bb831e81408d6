// plugctl/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use plugctl_common::config::Config;
use plugctl_common::error::Result as PlugResult;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod ui;

use cli::CliArgs;

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("PLUGCTL_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

#[tokio::main]
async fn main() -> PlugResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let config = match Config::load_with_overrides(
        cli_args.plugins_dir.clone(),
        cli_args.repo.clone(),
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };
    debug!(
        "Using plugins dir {} and repository {}",
        config.plugins_dir().display(),
        config.repo_url()
    );

    if let Err(e) = cli_args.command.run(&config).await {
        debug!("Command failed: {:?}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
