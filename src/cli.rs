use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mdcompare",
    version,
    about = "Compare two Markdown documents side by side"
)]
pub struct Cli {
    /// Original document
    pub old: PathBuf,

    /// Revised document
    pub new: PathBuf,

    /// Start in unified (single-column) view instead of split
    #[arg(short = 'u', long)]
    pub unified: bool,

    /// Show only changed lines and their context
    #[arg(short = 'd', long = "diff-only")]
    pub diff_only: bool,

    /// Unchanged lines kept around each change in diff-only mode
    #[arg(short = 'c', long = "context")]
    pub context: Option<usize>,

    /// Print the comparison to stdout instead of opening the viewer
    #[arg(short = 'p', long)]
    pub print: bool,

    /// Output format for --print
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Color theme
    #[arg(long)]
    pub theme: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored when stdout is a terminal, plain otherwise
    Auto,
    Plain,
    Color,
    Json,
}
