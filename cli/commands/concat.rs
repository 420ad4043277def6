use crate::output;
use anyhow::{Context, Result};
use cconcat_core::{self as core, Config};
use log;

pub fn handle_concat_command(config: &Config, quiet: bool) -> Result<()> {
    log::info!(
        "Concatenating {} source root(s) into {}",
        config.src.len(),
        config.dest.display()
    );
    for root in &config.src {
        log::debug!("Source root: {}", root.display());
    }

    let report = core::run(config).context("Concatenation failed")?;

    if !quiet {
        for warning in &report.summary.warnings {
            output::print_warning(warning);
        }
        output::print_summary(&report);
    }
    Ok(())
}
