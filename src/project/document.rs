//! Project document: the parse/normalize/rewrite engine
//!
//! Every public operation runs the same parse routine:
//!
//! 1. read and parse the XML (an unparsable file is logged and skipped)
//! 2. read the path mode declaration
//! 3. collect print-layout pictures (`Composer/Composition/ComposerPicture`)
//! 4. collect map layers (`projectlayers/maplayer`)
//! 5. when writing, declare the new path mode and save the tree
//!
//! Extracted paths are always absolute and in slash form. When writing, the
//! mapping table is applied first (it only knows absolute paths), then the
//! path is turned relative if requested. Only datasources of whitelisted
//! providers with a recognized file extension are ever rewritten.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::common::fs::write_atomically;
use crate::common::path_normalizer::{to_absolute, to_relative, to_slash};
use crate::config::{EngineConfig, MissingDatasource};
use crate::domain::{PathMode, SourceRecord};
use crate::error::{QdsmError, Result, file_read_failed, file_write_failed};
use crate::project::swap::SwapTable;
use crate::project::xml::{Element, XmlDocument};

const PATH_MODE: &[&str] = &["properties", "Paths", "Absolute"];
const COMPOSER_PICTURES: &[&str] = &["Composer", "Composition", "ComposerPicture"];
const MAP_LAYERS: &[&str] = &["projectlayers", "maplayer"];

/// Separator between a datasource path and its subset filter
const SUBSET_SEPARATOR: char = '|';

/// One QGIS project file and the sources it references
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    path: PathBuf,
    config: Arc<EngineConfig>,
    path_mode: PathMode,
    sources: Vec<SourceRecord>,
    parsed: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct ParseOptions<'a> {
    write: bool,
    write_relative: bool,
    swap: Option<&'a SwapTable>,
}

#[derive(Debug, PartialEq, Eq)]
enum LayerScan {
    Completed,
    Stopped,
}

impl ProjectDocument {
    /// Document at `path` using the default configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, Arc::new(EngineConfig::default()))
    }

    /// Document at `path`; a relative `path` is resolved against the
    /// current directory right away
    pub fn with_config(path: impl Into<PathBuf>, config: Arc<EngineConfig>) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        Self {
            path,
            config,
            path_mode: PathMode::Unknown,
            sources: Vec::new(),
            parsed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_mode(&self) -> PathMode {
        self.path_mode
    }

    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// True once at least one map layer datasource was processed
    pub fn parsed(&self) -> bool {
        self.parsed
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

    /// Discover the sources without touching the file
    pub fn read(&mut self) -> Result<()> {
        self.parse(ParseOptions::default())
    }

    /// Rewrite every rewritable source as an absolute path
    pub fn convert_to_absolute(&mut self) -> Result<()> {
        self.parse(ParseOptions {
            write: true,
            ..ParseOptions::default()
        })
    }

    /// Rewrite every rewritable source relative to the project directory
    pub fn convert_to_relative(&mut self) -> Result<()> {
        self.parse(ParseOptions {
            write: true,
            write_relative: true,
            ..ParseOptions::default()
        })
    }

    /// Relocate sources following the mapping table at `table`
    ///
    /// A malformed table fails before the project is even opened.
    pub fn relocate(&mut self, table: &Path, separator: char, write_relative: bool) -> Result<()> {
        let swap = SwapTable::load(table, separator)?;
        self.relocate_with(&swap, write_relative)
    }

    /// Relocate sources following an already loaded mapping table
    pub fn relocate_with(&mut self, swap: &SwapTable, write_relative: bool) -> Result<()> {
        self.parse(ParseOptions {
            write: true,
            write_relative,
            swap: Some(swap),
        })
    }

    /// Directory the relative sources are resolved against
    fn anchor_dir(&self) -> String {
        self.path
            .parent()
            .map(|parent| to_slash(&parent.to_string_lossy()))
            .unwrap_or_default()
    }

    fn parse(&mut self, options: ParseOptions<'_>) -> Result<()> {
        info!("Parsing {}", self.path.display());

        self.sources.clear();
        self.parsed = false;
        self.path_mode = PathMode::Unknown;

        let content =
            fs::read_to_string(&self.path).map_err(|e| file_read_failed(self.path.display(), e))?;

        let mut doc = match XmlDocument::parse(&content) {
            Ok(doc) => doc,
            Err(e) => {
                let err = QdsmError::DocumentParseFailed {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                };
                warn!("{}", err);
                return Ok(());
            }
        };

        self.path_mode = read_path_mode(doc.root());

        let anchor = self.anchor_dir();
        let mut scan = SourceScan {
            config: &self.config,
            anchor: &anchor,
            options,
            sources: Vec::new(),
            parsed: false,
        };
        scan.composer_resources(doc.root_mut());
        let outcome = scan.map_layers(doc.root_mut());

        self.sources = scan.sources;
        self.parsed = scan.parsed;

        if outcome == LayerScan::Stopped {
            warn!(
                "Stopped at a map layer without datasource, {} is left unchanged",
                self.path.display()
            );
            return Ok(());
        }

        if options.write {
            self.save(&mut doc, options.write_relative)?;
        }

        Ok(())
    }

    /// Declare the path mode and write the tree back to the project file
    fn save(&mut self, doc: &mut XmlDocument, write_relative: bool) -> Result<()> {
        let mode = PathMode::from_write_relative(write_relative);
        info!(">> Saving with {} paths", mode);

        let root = doc.root_mut();
        let declaration = match root.select(PATH_MODE).first() {
            Some(index) => root.at_mut(index),
            None => None,
        };
        match declaration {
            Some(element) => element.set_text(mode.declaration().unwrap_or_default()),
            None => warn!(
                "{} has no path mode property, leaving it undeclared",
                self.path.display()
            ),
        }
        self.path_mode = mode;

        let bytes = doc
            .to_bytes()
            .map_err(|e| file_write_failed(self.path.display(), e))?;
        write_atomically(&self.path, &bytes)
    }
}

fn read_path_mode(root: &Element) -> PathMode {
    let text = root
        .select(PATH_MODE)
        .first()
        .and_then(|index| root.at(index))
        .and_then(Element::text);
    PathMode::from_declaration(text.as_deref())
}

fn child_text(element: &Element, name: &str) -> Option<String> {
    element.child(name).and_then(Element::text)
}

/// State of a single parse pass
struct SourceScan<'a> {
    config: &'a EngineConfig,
    anchor: &'a str,
    options: ParseOptions<'a>,
    sources: Vec<SourceRecord>,
    parsed: bool,
}

impl SourceScan<'_> {
    fn composer_resources(&mut self, root: &mut Element) {
        debug!("  > Composer resources");

        for index in root.select(COMPOSER_PICTURES) {
            let Some(picture) = root.at_mut(&index) else {
                continue;
            };
            let Some(raw) = picture.attribute("file") else {
                warn!("Skipping composer picture without file attribute");
                continue;
            };

            let path = to_absolute(&raw, self.anchor);
            debug!("    - {}", path);
            let mut record = SourceRecord::composer(path);

            if self.options.write {
                let written = self.rewrite(&mut record);
                picture.set_attribute("file", &written);
            }

            self.sources.push(record);
        }
    }

    fn map_layers(&mut self, root: &mut Element) -> LayerScan {
        debug!("  > Map layer datasources");

        for index in root.select(MAP_LAYERS) {
            let Some(layer) = root.at_mut(&index) else {
                continue;
            };

            let Some(provider) = child_text(layer, "provider") else {
                warn!("Skipping map layer with no provider");
                continue;
            };

            let Some(datasource) = child_text(layer, "datasource") else {
                match self.config.missing_datasource {
                    MissingDatasource::Continue => {
                        warn!("Skipping map layer with no datasource");
                        continue;
                    }
                    MissingDatasource::Stop => return LayerScan::Stopped,
                }
            };

            let layer_kind = layer.attribute("type");
            let layer_name = child_text(layer, "layername");

            // Only file providers get their subset filter split out; any other
            // datasource is kept byte for byte.
            let (base, subset) = if self.config.is_whitelisted(&provider) {
                match datasource.split_once(SUBSET_SEPARATOR) {
                    Some((base, subset)) => (base.to_string(), Some(subset.to_string())),
                    None => (datasource, None),
                }
            } else {
                (datasource, None)
            };

            let rewritable = self.config.is_rewritable(&provider, &base);
            let path = if rewritable {
                to_absolute(&base, self.anchor)
            } else {
                base
            };
            debug!("    - {}", path);

            let mut record = SourceRecord::map_layer(
                path,
                provider,
                layer_kind,
                layer_name,
                subset.clone().unwrap_or_default(),
            );

            if self.options.write && rewritable {
                let mut written = self.rewrite(&mut record);
                if let Some(subset) = &subset {
                    written.push(SUBSET_SEPARATOR);
                    written.push_str(subset);
                }
                if let Some(datasource) = layer.child_mut("datasource") {
                    datasource.set_text(&written);
                }
            }

            self.sources.push(record);
            self.parsed = true;
        }

        LayerScan::Completed
    }

    /// Swap then relative conversion; returns the string to write
    ///
    /// A swapped location replaces the record path.
    fn rewrite(&self, record: &mut SourceRecord) -> String {
        let mut path = record.path.clone();

        if let Some(swap) = self.options.swap {
            path = swap.apply(&path);
            if path != record.path {
                info!("    <-> Swap to {}", path);
                record.path.clone_from(&path);
            }
        }

        if self.options.write_relative {
            path = to_relative(&path, self.anchor);
        }

        path
    }
}

impl fmt::Display for ProjectDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        for source in &self.sources {
            write!(f, "\n\t{}", source)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ProjectDocument {
    type Item = &'a SourceRecord;
    type IntoIter = std::slice::Iter<'a, SourceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
