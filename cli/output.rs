use cconcat_core::RunReport;
use colored::*;
use std::fmt::Display;

pub fn print_error(err: &dyn Display) {
    eprintln!("{} {}", "ERROR:".red().bold(), err);
}

pub fn print_warning(msg: &dyn Display) {
    eprintln!("{} {}", "WARNING:".yellow(), msg);
}

pub fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    println!(
        "{} Merged {} file(s) ({} exposed, {} ranked, {} unranked headers; {} implementation files)",
        "✅".green(),
        summary.total_files().to_string().cyan(),
        summary.exposed,
        summary.ranked,
        summary.unranked,
        summary.implementation
    );
    println!(
        "   {} {}",
        "header:".green(),
        report.outputs.header.display().to_string().blue()
    );
    println!(
        "   {} {}",
        "source:".green(),
        report.outputs.source.display().to_string().blue()
    );
}
