//! Unique sources across a set of projects

use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use serde::Serialize;

use crate::domain::SourceRecord;
use crate::error::Result;
use crate::project::collection::{ProjectCollection, bool_field};

/// Column names of the unique-source dump
pub const DUMP_HEADER: &[&str] = &["composer", "path", "exists", "layer_kind", "provider"];

/// Row selection for [`SourceCollection::dump`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFilter {
    Composer,
    MapLayer,
    Missing,
    Provider(String),
}

impl SourceFilter {
    pub fn matches(&self, source: &SourceRecord) -> bool {
        match self {
            Self::Composer => source.is_composer_resource,
            Self::MapLayer => !source.is_composer_resource,
            Self::Missing => !source.exists(),
            Self::Provider(provider) => source.provider.as_deref() == Some(provider.as_str()),
        }
    }

    /// True when `filters` is empty or any of them matches
    pub fn matches_any(filters: &[Self], source: &SourceRecord) -> bool {
        filters.is_empty() || filters.iter().any(|f| f.matches(source))
    }
}

/// Deduplicated source list
///
/// Paths are compared case-insensitively; the first record of every path wins.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SourceCollection {
    sources: Vec<SourceRecord>,
}

impl SourceCollection {
    pub fn from_projects(projects: &ProjectCollection) -> Self {
        let mut seen: HashSet<&SourceRecord> = HashSet::new();
        let sources = projects
            .iter()
            .flat_map(|doc| doc.iter())
            .filter(|src| seen.insert(*src))
            .cloned()
            .collect();
        Self { sources }
    }

    /// Sort by path, case-insensitively
    pub fn sort(&mut self) {
        self.sources.sort();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceRecord> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of sources per extension; sources without one count under `""`
    pub fn extension_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for src in &self.sources {
            *counts
                .entry(src.extension().unwrap_or_default().to_string())
                .or_insert(0) += 1;
        }
        counts
    }

    /// Write one row per source matching any of `filters` (all rows when empty)
    pub fn dump(&self, output: &mut dyn Write, sep: char, filters: &[SourceFilter]) -> Result<()> {
        let sep = sep.to_string();
        writeln!(output, "{}", DUMP_HEADER.join(&sep))?;

        for src in &self.sources {
            if !SourceFilter::matches_any(filters, src) {
                continue;
            }
            let row: [&str; 5] = [
                bool_field(src.is_composer_resource),
                &src.path,
                bool_field(src.exists()),
                src.layer_kind.as_deref().unwrap_or_default(),
                src.provider.as_deref().unwrap_or_default(),
            ];
            writeln!(output, "{}", row.join(&sep))?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a SourceCollection {
    type Item = &'a SourceRecord;
    type IntoIter = std::slice::Iter<'a, SourceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::ui::SilentProgressReporter;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_project(path: &Path, picture: &str, datasources: &[&str]) {
        let layers: String = datasources
            .iter()
            .map(|ds| {
                format!(
                    "<maplayer type=\"raster\"><datasource>{ds}</datasource>\
                     <provider>gdal</provider></maplayer>"
                )
            })
            .collect();
        let xml = format!(
            "<qgis><Composer><Composition><ComposerPicture file=\"{picture}\"/></Composition></Composer>\
             <projectlayers>{layers}</projectlayers></qgis>"
        );
        fs::write(path, xml).expect("Failed to write project");
    }

    fn read_all(temp: &TempDir) -> ProjectCollection {
        let mut projects =
            ProjectCollection::discover(&[temp.path()], Arc::new(EngineConfig::default()))
                .expect("Discovery should succeed");
        projects
            .read(&mut SilentProgressReporter)
            .expect("Read should succeed");
        projects
    }

    #[test]
    fn test_deduplicates_across_projects() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        write_project(&temp.path().join("a.qgs"), "/img/logo.png", &["/d/B.tif", "/d/a.tif"]);
        write_project(&temp.path().join("b.qgs"), "/img/logo.png", &["/d/a.tif", "/d/c.ecw"]);

        let projects = read_all(&temp);
        let mut sources = projects.unique_sources();

        assert_eq!(sources.len(), 4);
        let first = sources.iter().next().expect("At least one source");
        assert!(first.is_composer_resource);

        sources.sort();
        let paths: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, ["/d/a.tif", "/d/B.tif", "/d/c.ecw", "/img/logo.png"]);
    }

    #[test]
    fn test_paths_differing_in_case_are_one_source() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        write_project(&temp.path().join("a.qgs"), "/img/x.png", &["/d/a.tif", "/d/A.tif"]);
        write_project(&temp.path().join("b.qgs"), "/IMG/X.PNG", &[]);

        let sources = read_all(&temp).unique_sources();
        let paths: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, ["/img/x.png", "/d/a.tif"]);
    }

    #[test]
    fn test_extension_counts() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        write_project(&temp.path().join("a.qgs"), "/img/x.png", &["/d/a.tif", "/d/b.tif"]);

        let counts = read_all(&temp).unique_sources().extension_counts();
        assert_eq!(counts.get(".tif"), Some(&2));
        assert_eq!(counts.get(".png"), Some(&1));
    }

    #[test]
    fn test_dump_with_filter() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        write_project(&temp.path().join("a.qgs"), "/img/x.png", &["/d/a.tif"]);
        let sources = read_all(&temp).unique_sources();

        let mut out = Vec::new();
        sources
            .dump(&mut out, ';', &[SourceFilter::Composer])
            .expect("Dump should succeed");
        let text = String::from_utf8(out).expect("Dump is UTF-8");

        assert_eq!(
            text,
            "composer;path;exists;layer_kind;provider\ntrue;/img/x.png;false;;\n"
        );
    }

    #[test]
    fn test_dump_without_filter_lists_everything() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        write_project(&temp.path().join("a.qgs"), "/img/x.png", &["/d/a.tif"]);
        let sources = read_all(&temp).unique_sources();

        let mut out = Vec::new();
        sources.dump(&mut out, '\t', &[]).expect("Dump should succeed");
        let text = String::from_utf8(out).expect("Dump is UTF-8");

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("false\t/d/a.tif\tfalse\traster\tgdal"));
    }

    #[test]
    fn test_filter_matches() {
        let layer = SourceRecord::map_layer("/nowhere/a.shp", "ogr", None, None, "");
        assert!(SourceFilter::MapLayer.matches(&layer));
        assert!(SourceFilter::Missing.matches(&layer));
        assert!(SourceFilter::Provider("ogr".to_string()).matches(&layer));
        assert!(!SourceFilter::Provider("gdal".to_string()).matches(&layer));
        assert!(!SourceFilter::Composer.matches(&layer));
    }
}
