//! Command helper utilities

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::{Style, Term};

use crate::config::EngineConfig;
use crate::error::{Result, file_write_failed};
use crate::project::ProjectCollection;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Load the engine configuration and discover the projects under `folders`
pub fn discover_projects(folders: &[PathBuf], config: Option<&Path>) -> Result<ProjectCollection> {
    let config = EngineConfig::load_or_default(config)?;
    ProjectCollection::discover(folders, Arc::new(config))
}

/// Progress bar on an interactive terminal, nothing otherwise
///
/// Verbose runs stay silent so that log lines are not interleaved with the bar.
pub fn progress_for(total: usize, verbose: u8) -> Box<dyn ProgressReporter> {
    if verbose == 0 && Term::stderr().is_term() {
        Box::new(InteractiveProgressReporter::new(total as u64))
    } else {
        Box::new(SilentProgressReporter)
    }
}

/// Buffered writer over a freshly created output file
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| file_write_failed(path.display(), e))?;
    Ok(BufWriter::new(file))
}

/// Report projects that could not be parsed
pub fn report_unparsed(projects: &ProjectCollection) {
    let unparsed: Vec<_> = projects.iter().filter(|doc| !doc.parsed()).collect();
    if unparsed.is_empty() {
        return;
    }

    println!(
        "{}",
        Style::new()
            .yellow()
            .apply_to(format!("{} project(s) without map layers or not parsed:", unparsed.len()))
    );
    for doc in unparsed {
        println!("  {}", doc.path().display());
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_projects_missing_config() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let result = discover_projects(
            &[temp.path().to_path_buf()],
            Some(&temp.path().join("missing.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_projects_default_config() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let projects =
            discover_projects(&[temp.path().to_path_buf()], None).expect("Discovery should succeed");
        assert!(projects.is_empty());
    }

    #[test]
    fn test_create_output_in_missing_directory() {
        let result = create_output(Path::new("/nonexistent/dir/out.tsv"));
        assert!(result.is_err());
    }
}
