//! Relocate command implementation

use std::path::Path;

use console::Style;

use crate::cli::RelocateArgs;
use crate::commands::helpers::{discover_projects, progress_for, report_unparsed};
use crate::error::Result;

/// Apply a mapping table to every project found under the given folders
pub fn run(config: Option<&Path>, verbose: u8, args: RelocateArgs) -> Result<()> {
    let mut projects = discover_projects(&args.folders, config)?;

    let mut progress = progress_for(projects.len(), verbose);
    projects.relocate(
        &args.table,
        args.separator,
        args.relative,
        progress.as_mut(),
    )?;

    println!(
        "{} {} project(s) using {}",
        Style::new().bold().green().apply_to("Relocated"),
        projects.len(),
        args.table.display()
    );
    report_unparsed(&projects);

    Ok(())
}
