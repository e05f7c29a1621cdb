use clap::Parser;
use std::path::PathBuf;

use super::parse_separator;

/// Arguments for the relocate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Move sources listed in a table:\n    qdsm relocate ./maps --table moves.csv\n\n\
                  Use a comma separated table and store relative paths:\n    \
                  qdsm relocate ./maps --table moves.csv --separator , --relative\n\n\
                  TABLE FORMAT:\n  \
                  One 'old_path;new_path' pair per line, absolute paths, no header.")]
pub struct RelocateArgs {
    /// Folders searched recursively for .qgs files
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,

    /// Mapping table of old to new source locations
    #[arg(long, short = 't', value_name = "FILE")]
    pub table: PathBuf,

    /// Column separator of the mapping table
    #[arg(long, short = 's', default_value = ";", value_parser = parse_separator)]
    pub separator: char,

    /// Write relocated sources relative to each project
    #[arg(long)]
    pub relative: bool,
}
