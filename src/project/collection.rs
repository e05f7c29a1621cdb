//! Batch operations over many project files

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::common::fs::find_project_files;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::project::document::ProjectDocument;
use crate::project::sources::{SourceCollection, SourceFilter};
use crate::project::swap::SwapTable;
use crate::ui::ProgressReporter;

/// Column names of the per-project dump
pub const DUMP_HEADER: &[&str] = &[
    "project",
    "path_mode",
    "composer",
    "path",
    "subset",
    "exists",
    "layer_kind",
    "provider",
    "layer",
];

/// Ordered set of project documents sharing one configuration
#[derive(Debug, Clone)]
pub struct ProjectCollection {
    projects: Vec<ProjectDocument>,
}

impl ProjectCollection {
    /// Collect every `.qgs` file found under `folders`
    pub fn discover<P: AsRef<Path>>(folders: &[P], config: Arc<EngineConfig>) -> Result<Self> {
        let paths = find_project_files(folders)?;
        info!("Found {} project(s)", paths.len());
        Ok(Self::from_paths(paths, config))
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>, config: Arc<EngineConfig>) -> Self {
        let projects = paths
            .into_iter()
            .map(|path| ProjectDocument::with_config(path, Arc::clone(&config)))
            .collect();
        Self { projects }
    }

    pub fn projects(&self) -> &[ProjectDocument] {
        &self.projects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectDocument> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn read(&mut self, progress: &mut dyn ProgressReporter) -> Result<()> {
        self.run_each(progress, ProjectDocument::read)
    }

    pub fn convert_to_absolute(&mut self, progress: &mut dyn ProgressReporter) -> Result<()> {
        self.run_each(progress, ProjectDocument::convert_to_absolute)
    }

    pub fn convert_to_relative(&mut self, progress: &mut dyn ProgressReporter) -> Result<()> {
        self.run_each(progress, ProjectDocument::convert_to_relative)
    }

    /// Relocate every project; the table is loaded once, before any project
    pub fn relocate(
        &mut self,
        table: &Path,
        separator: char,
        write_relative: bool,
        progress: &mut dyn ProgressReporter,
    ) -> Result<()> {
        let swap = SwapTable::load(table, separator)?;
        info!("Loaded {} mapping(s) from {}", swap.len(), table.display());
        self.run_each(progress, |doc| doc.relocate_with(&swap, write_relative))
    }

    fn run_each<F>(&mut self, progress: &mut dyn ProgressReporter, mut op: F) -> Result<()>
    where
        F: FnMut(&mut ProjectDocument) -> Result<()>,
    {
        let total = self.projects.len();
        for (i, doc) in self.projects.iter_mut().enumerate() {
            progress.update_project(&doc.path().display().to_string(), i + 1, total);
            if let Err(e) = op(doc) {
                progress.abandon();
                return Err(e);
            }
            progress.inc_project();
        }
        progress.finish();
        Ok(())
    }

    /// True when every project has been parsed
    pub fn parsed(&self) -> bool {
        self.projects.iter().all(ProjectDocument::parsed)
    }

    pub fn unique_sources(&self) -> SourceCollection {
        SourceCollection::from_projects(self)
    }

    /// Write one row per source of every project matching any of `filters`
    /// (all rows when empty)
    pub fn dump(&self, output: &mut dyn Write, sep: char, filters: &[SourceFilter]) -> Result<()> {
        let sep = sep.to_string();
        writeln!(output, "{}", DUMP_HEADER.join(&sep))?;

        for doc in &self.projects {
            let project = doc.path().display().to_string();
            let path_mode = doc.path_mode().to_string();
            for src in doc.iter().filter(|src| SourceFilter::matches_any(filters, src)) {
                let row: [&str; 9] = [
                    project.as_str(),
                    path_mode.as_str(),
                    bool_field(src.is_composer_resource),
                    &src.path,
                    &src.subset_filter,
                    bool_field(src.exists()),
                    src.layer_kind.as_deref().unwrap_or_default(),
                    src.provider.as_deref().unwrap_or_default(),
                    src.layer_name.as_deref().unwrap_or_default(),
                ];
                writeln!(output, "{}", row.join(&sep))?;
            }
        }

        Ok(())
    }
}

pub(crate) fn bool_field(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl<'a> IntoIterator for &'a ProjectCollection {
    type Item = &'a ProjectDocument;
    type IntoIter = std::slice::Iter<'a, ProjectDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
