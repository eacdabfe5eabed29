use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally — a single-file stock ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file to read and write (overrides the configured default)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add stock for an item
    Add(MutateArgs),
    /// Remove stock for an item
    Remove(MutateArgs),
    /// Show the quantity of one item
    Qty(QtyArgs),
    /// List items below a threshold
    Low(LowArgs),
    /// Print every tracked item
    Report(ReportArgs),
    /// Run the scripted walkthrough against the snapshot file
    Demo(DemoArgs),
}

// Quantities stay text here; commands coerce them into ledger errors.
#[derive(Args)]
pub struct MutateArgs {
    pub item: String,
    #[arg(allow_hyphen_values = true)]
    pub qty: String,
}

#[derive(Args)]
pub struct QtyArgs {
    pub item: String,
}

#[derive(Args)]
pub struct LowArgs {
    #[arg(short, long, default_value = "5", allow_hyphen_values = true)]
    pub threshold: String,
}

#[derive(Args)]
pub struct ReportArgs {}

#[derive(Args)]
pub struct DemoArgs {}
