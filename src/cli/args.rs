use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aurwatch",
    about = "Scheduled AUR package rebuild daemon",
    long_about = "Polls AUR metadata for configured packages and rebuilds them when upstream changes",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Config file (default: $AURWATCH_CONFIG or the user config dir)
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the scheduler until interrupted
    Run {
        /// Allow running as root
        #[arg(long)]
        allow_root: bool,
    },

    /// Check packages once and exit
    Check {
        /// Packages to check (default: all configured)
        packages: Vec<String>,

        /// Allow running as root
        #[arg(long)]
        allow_root: bool,
    },

    /// Show persisted state of configured packages
    Status {
        /// Only this package
        package: Option<String>,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Clear the failed-version marker so the next check rebuilds
    ResetFailed {
        package: String,
    },
}
