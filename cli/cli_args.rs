use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFileOpts {
    #[arg(
        long,
        help = "Read settings from this TOML file (default: ./cconcat.toml if present).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Configuration"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not load any TOML config file.",
        conflicts_with = "config",
        help_heading = "Configuration"
    )]
    pub no_config: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate a tree of C headers and sources into one header and one source file.",
    long_about = "cconcat collects every .h and .c file under the given source roots and merges \nthem into <target>.h and <target>.c. A first-line `// RANK=<n>` orders internal \nheaders, `// EXPOSE <n>` moves a header into the public <target>.h, and include \nlines are deduplicated across all files.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  cconcat --src lib --dest build --target mylib\n  cconcat --src src --src vendor --reject-dir src/tests -v"
)]
pub struct Cli {
    #[arg(
        long = "src",
        value_name = "DIR",
        help = "Source root to scan recursively (repeatable, at least one required).",
        help_heading = "Sources"
    )]
    pub src: Vec<PathBuf>,

    #[arg(
        long = "reject-dir",
        value_name = "DIR",
        help = "Skip files directly inside this directory; its subdirectories are still scanned (repeatable).",
        help_heading = "Sources"
    )]
    pub reject_dir: Vec<PathBuf>,

    #[arg(
        long = "reject-file",
        value_name = "FILE",
        help = "Skip this file (repeatable).",
        help_heading = "Sources"
    )]
    pub reject_file: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory the generated files are written to (default: current dir).",
        help_heading = "Output"
    )]
    pub dest: Option<PathBuf>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Basename of the generated files (default: concat).",
        help_heading = "Output"
    )]
    pub target: Option<String>,

    #[clap(flatten)]
    pub config_file: ConfigFileOpts,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(short, long, help = "Silence the summary, warnings and log output.")]
    pub quiet: bool,
}
