mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use log;
use std::env;
use std::path::Path;
use std::process;

use cconcat_core::Config;
use cli_args::Cli;

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);
    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(&cli_args) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            // Every failure is fatal and reported, even with --quiet.
            output::print_error(&format!("{:#}", e));
            1
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: &Cli) -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let config = load_config(cli, &cwd)?;
    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);
    commands::concat::handle_concat_command(&config, cli.quiet)
}

/// Builds the effective configuration: config file (if any), then CLI
/// overrides, with every path made absolute against `cwd`.
fn load_config(cli: &Cli, cwd: &Path) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        cwd,
        cli.config_file.config.as_ref(),
        cli.config_file.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    Ok(merge_config_with_cli_overrides(config, cli).resolve_paths(cwd))
}

fn merge_config_with_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if !cli.src.is_empty() {
        config.src = cli.src.clone();
    }
    if !cli.reject_dir.is_empty() {
        config.reject_dir = cli.reject_dir.clone();
    }
    if !cli.reject_file.is_empty() {
        config.reject_file = cli.reject_file.clone();
    }
    if let Some(dest) = &cli.dest {
        config.dest = dest.clone();
    }
    if let Some(target) = &cli.target {
        config.target = target.clone();
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}
