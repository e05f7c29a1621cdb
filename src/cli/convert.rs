use clap::Parser;
use std::path::PathBuf;

/// Arguments shared by the absolute and relative commands
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Store paths relative to each project:\n    qdsm relative ./maps\n\n\
                  Store absolute paths:\n    qdsm absolute ./maps ./archive")]
pub struct ConvertArgs {
    /// Folders searched recursively for .qgs files
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,
}
