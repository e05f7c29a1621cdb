//! Absolute and relative conversion commands

use std::path::Path;

use console::Style;

use crate::cli::ConvertArgs;
use crate::commands::helpers::{discover_projects, progress_for, report_unparsed};
use crate::domain::PathMode;
use crate::error::Result;

/// Rewrite the sources of every project found under the given folders
pub fn run(
    config: Option<&Path>,
    verbose: u8,
    args: ConvertArgs,
    write_relative: bool,
) -> Result<()> {
    let mut projects = discover_projects(&args.folders, config)?;

    let mut progress = progress_for(projects.len(), verbose);
    if write_relative {
        projects.convert_to_relative(progress.as_mut())?;
    } else {
        projects.convert_to_absolute(progress.as_mut())?;
    }

    println!(
        "{} {} project(s) to {} paths",
        Style::new().bold().green().apply_to("Converted"),
        projects.len(),
        PathMode::from_write_relative(write_relative)
    );
    report_unparsed(&projects);

    Ok(())
}
