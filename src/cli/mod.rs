//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - scan: Scan command arguments
//! - convert: Absolute/relative conversion arguments
//! - relocate: Relocate command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod convert;
pub mod relocate;
pub mod scan;

pub use completions::CompletionsArgs;
pub use convert::ConvertArgs;
pub use relocate::RelocateArgs;
pub use scan::ScanArgs;

/// qdsm - QGIS datasource manager
///
/// Inventory and rewrite the datasource paths stored in QGIS project files.
#[derive(Parser, Debug)]
#[command(
    name = "qdsm",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Datasource manager for QGIS project files",
    long_about = "qdsm scans QGIS project files (.qgs), lists the datasources they reference \
                  (print layout pictures and map layers), converts their paths between absolute \
                  and relative form and relocates them in bulk from a mapping table.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  qdsm scan ./maps --unique --sort         \x1b[90m# List every distinct datasource\x1b[0m\n   \
                  qdsm scan ./maps --dump sources.tsv      \x1b[90m# Dump all sources as a table\x1b[0m\n   \
                  qdsm relative ./maps                     \x1b[90m# Store paths relative to each project\x1b[0m\n   \
                  qdsm absolute ./maps                     \x1b[90m# Store absolute paths\x1b[0m\n   \
                  qdsm relocate ./maps --table moves.csv   \x1b[90m# Move sources to new locations\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Engine configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "QDSM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (repeat for more detail)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the datasources of project files
    Scan(ScanArgs),

    /// Rewrite datasource paths as absolute paths
    Absolute(ConvertArgs),

    /// Rewrite datasource paths relative to each project
    Relative(ConvertArgs),

    /// Move datasources following a mapping table
    Relocate(RelocateArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Parse a single-character separator; `\t` and `tab` stand for a tab
pub fn parse_separator(value: &str) -> Result<char, String> {
    if matches!(value, "\\t" | "tab") {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("separator must be a single character, got '{}'", value)),
    }
}
