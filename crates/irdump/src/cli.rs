use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Longest schedule period accepted, one year.
pub const MAX_EVERY_HOURS: u64 = 24 * 366;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,

    /// Directory holding one folder per company; overrides IRDUMP_DATA_DIR.
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape every company's investor-relations page once.
    Spider {
        /// Only scrape the named companies (display name or directory slug).
        ///
        /// If no companies are provided, spider will scrape the whole roster.
        #[arg(short, long)]
        companies: Option<Vec<String>>,
    },

    /// Scrape the whole roster, then repeat on a fixed period.
    Schedule {
        /// Hours to sleep between runs.
        #[arg(
            long,
            default_value_t = 24,
            value_parser = clap::value_parser!(u64).range(1..=MAX_EVERY_HOURS)
        )]
        every: u64,
    },

    /// Print the roster.
    Roster,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
