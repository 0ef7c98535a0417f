use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "lmu-setup")]
#[command(about = "Inspect, group and compare Le Mans Ultimate car setups")]
pub struct Cli {
    /// Directory with tracks.toml, cars.toml, labels.toml or categories.toml
    /// overriding the built-in tables.
    #[arg(long, global = true)]
    pub tables_dir: Option<PathBuf>,
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the parsed structure and car of one setup file.
    Inspect(InspectArgs),
    /// Show one display category of a setup file.
    Show(ShowArgs),
    /// Compare two setup files under one display category.
    Diff(DiffArgs),
    /// Resolve technical car names to display identities.
    Identify(IdentifyArgs),
    /// List the setups of a Settings directory grouped by track.
    List(ListArgs),
    /// Summarise the loaded reference tables.
    Tables(TablesArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    pub file: PathBuf,
    /// Category id; every section is shown when omitted.
    #[arg(long)]
    pub category: Option<String>,
    /// Arrange groups using the category's row layout.
    #[arg(long)]
    pub layout: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    pub file1: PathBuf,
    pub file2: PathBuf,
    /// Category id; every section is compared when omitted.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the compared/changed counts.
    #[arg(long)]
    pub summary: bool,
    /// Hide rows whose values match.
    #[arg(long)]
    pub only_changed: bool,
}

#[derive(Parser, Debug)]
pub struct IdentifyArgs {
    /// Technical names such as "GT3 BMW_M4_LMGT3 WEC2025".
    #[arg(required = true)]
    pub technical: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// The simulator's Settings directory (one sub-folder per track).
    pub settings_dir: PathBuf,
    /// Only list setups of this class; repeatable.
    #[arg(long = "class")]
    pub classes: Vec<String>,
    /// Leave out one setup, given as track/name.
    #[arg(long)]
    pub exclude: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct TablesArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
