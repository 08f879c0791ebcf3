use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::types::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "linksniff",
    version,
    about = "Heuristic phishing risk scoring for links and documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (TOML). Default: config/linksniff.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, default_value = "data/linksniff.log", global = true)]
    pub log_file: PathBuf,

    /// SQLite path for scan history (overrides history.db_path)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Score without recording anything to history
    #[arg(long, global = true)]
    pub no_record: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a single URL
    Url {
        url: String,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormatArg>,
        /// Output file path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score every URL found in a text document (`-` reads stdin)
    Doc {
        input: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormatArg>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show recorded scans and statistics
    History {
        /// Number of entries to list (defaults to history.view_limit)
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum)]
        format: Option<OutputFormatArg>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Json,
    Jsonl,
    Markdown,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}
