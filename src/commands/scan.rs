//! Scan command implementation
//!
//! Reads every project found under the given folders and reports the
//! datasources they reference, either per project or as a distinct list.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use console::Style;
use serde::Serialize;

use crate::cli::ScanArgs;
use crate::commands::helpers::{create_output, discover_projects, progress_for, report_unparsed};
use crate::domain::{PathMode, SourceRecord};
use crate::error::Result;
use crate::project::{ProjectCollection, SourceCollection, SourceFilter};

#[derive(Serialize)]
struct SourceReport<'a> {
    #[serde(flatten)]
    source: &'a SourceRecord,
    exists: bool,
}

impl<'a> SourceReport<'a> {
    fn new(source: &'a SourceRecord) -> Self {
        Self {
            source,
            exists: source.exists(),
        }
    }
}

#[derive(Serialize)]
struct ProjectReport<'a> {
    path: String,
    path_mode: PathMode,
    parsed: bool,
    sources: Vec<SourceReport<'a>>,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    projects: Vec<ProjectReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unique: Option<Vec<SourceReport<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<BTreeMap<String, usize>>,
}

/// Run scan command
pub fn run(config: Option<&Path>, verbose: u8, args: ScanArgs) -> Result<()> {
    let mut projects = discover_projects(&args.folders, config)?;

    let mut progress = progress_for(projects.len(), verbose);
    projects.read(progress.as_mut())?;

    let mut sources = projects.unique_sources();
    if args.sort {
        sources.sort();
    }

    let filters = if args.missing {
        vec![SourceFilter::Missing]
    } else {
        Vec::new()
    };

    if let Some(ref path) = args.dump {
        let mut output = create_output(path)?;
        projects.dump(&mut output, args.sep, &filters)?;
        output.flush()?;
    }

    if let Some(ref path) = args.unique_dump {
        let mut output = create_output(path)?;
        sources.dump(&mut output, args.sep, &filters)?;
        output.flush()?;
    }

    if args.json {
        return print_json(&projects, &sources, &args);
    }

    if args.unique {
        display_unique(&sources, args.missing);
    } else {
        display_projects(&projects, args.missing);
    }

    if args.extensions {
        display_extensions(&sources.extension_counts());
    }

    display_summary(&projects, &sources);
    for path in [&args.dump, &args.unique_dump].into_iter().flatten() {
        println!(
            "{} {}",
            Style::new().green().apply_to("Wrote"),
            path.display()
        );
    }

    Ok(())
}

fn keep(source: &SourceRecord, missing_only: bool) -> bool {
    !missing_only || !source.exists()
}

fn print_json(
    projects: &ProjectCollection,
    sources: &SourceCollection,
    args: &ScanArgs,
) -> Result<()> {
    let report = ScanReport {
        projects: projects
            .iter()
            .map(|doc| ProjectReport {
                path: doc.path().display().to_string(),
                path_mode: doc.path_mode(),
                parsed: doc.parsed(),
                sources: doc
                    .iter()
                    .filter(|src| keep(src, args.missing))
                    .map(SourceReport::new)
                    .collect(),
            })
            .collect(),
        unique: args.unique.then(|| {
            sources
                .iter()
                .filter(|src| keep(src, args.missing))
                .map(SourceReport::new)
                .collect()
        }),
        extensions: args.extensions.then(|| sources.extension_counts()),
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn display_source(source: &SourceRecord) {
    let kind = if source.is_composer_resource {
        "composer".to_string()
    } else {
        source.provider.clone().unwrap_or_default()
    };

    let mut line = format!(
        "    {} {}",
        Style::new().dim().apply_to(format!("[{}]", kind)),
        source.path
    );
    if !source.subset_filter.is_empty() {
        line.push_str(&format!(
            " {}",
            Style::new().dim().apply_to(format!("| {}", source.subset_filter))
        ));
    }
    if !source.exists() {
        line.push_str(&format!(" {}", Style::new().red().apply_to("(missing)")));
    }
    println!("{}", line);
}

fn display_projects(projects: &ProjectCollection, missing_only: bool) {
    for doc in projects {
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(doc.path().display()),
            Style::new().dim().apply_to(format!("({} paths)", doc.path_mode()))
        );
        for source in doc.iter().filter(|src| keep(src, missing_only)) {
            display_source(source);
        }
        println!();
    }
}

fn display_unique(sources: &SourceCollection, missing_only: bool) {
    println!("{}", Style::new().bold().apply_to("Sources:"));
    for source in sources.iter().filter(|src| keep(src, missing_only)) {
        display_source(source);
    }
    println!();
}

fn display_extensions(counts: &BTreeMap<String, usize>) {
    println!("{}", Style::new().bold().apply_to("Extensions:"));
    for (extension, count) in counts {
        let extension = if extension.is_empty() {
            "(none)"
        } else {
            extension.as_str()
        };
        println!("    {:<10} {}", extension, count);
    }
    println!();
}

fn display_summary(projects: &ProjectCollection, sources: &SourceCollection) {
    let missing = sources.iter().filter(|src| !src.exists()).count();
    println!(
        "{} {} project(s), {} distinct source(s), {} missing",
        Style::new().bold().green().apply_to("Scanned"),
        projects.len(),
        sources.len(),
        missing
    );
    report_unparsed(projects);
}
