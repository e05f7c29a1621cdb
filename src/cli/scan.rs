use clap::Parser;
use std::path::PathBuf;

use super::parse_separator;

/// Arguments for the scan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List the sources of every project:\n    qdsm scan ./maps\n\n\
                  List distinct sources, sorted:\n    qdsm scan ./maps --unique --sort\n\n\
                  Show only sources that do not exist:\n    qdsm scan ./maps --unique --missing\n\n\
                  Count sources per extension:\n    qdsm scan ./maps --extensions\n\n\
                  Dump tables:\n    qdsm scan ./maps --dump all.tsv --unique-dump unique.tsv")]
pub struct ScanArgs {
    /// Folders searched recursively for .qgs files
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,

    /// List every distinct source once instead of per project
    #[arg(long)]
    pub unique: bool,

    /// Sort distinct sources by path
    #[arg(long)]
    pub sort: bool,

    /// Count distinct sources per file extension
    #[arg(long)]
    pub extensions: bool,

    /// Only report sources missing on disk (also applies to both dumps)
    #[arg(long)]
    pub missing: bool,

    /// Write one row per source of every project to FILE
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Write one row per distinct source to FILE
    #[arg(long, value_name = "FILE")]
    pub unique_dump: Option<PathBuf>,

    /// Column separator of dumped tables
    #[arg(long, default_value = "\\t", value_parser = parse_separator)]
    pub sep: char,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
