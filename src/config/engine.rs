//! Engine configuration
//!
//! Which providers and file extensions the engine is allowed to rewrite, and
//! what to do with map layers that carry no datasource. Defaults cover the
//! GDAL/OGR file providers; a YAML file can override any of it:
//!
//! ```yaml
//! providers: [ogr, gdal]
//! extensions: [.shp, .tif]
//! missing_datasource: stop
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QdsmError, Result};

/// Providers whose datasource path can be rewritten
pub const DEFAULT_PROVIDERS: &[&str] = &["ogr", "gdal"];

/// Extensions of file-based datasources
///
/// Keeps non-file datasources (web services, database urls) away from the
/// path rewriting: a dead link still has a valid extension, whereas testing
/// for existence would skip outdated paths.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".shp", ".tab", ".dxf", ".osm", ".kml", ".gml", ".gpx", ".geojson", ".tif", ".tiff", ".jpg",
    ".jpeg", ".png", ".jp2", ".ecw", ".vrt", ".gpkg", ".sqlite", ".db", ".mbtiles", ".csv", ".txt",
    ".xls", ".xlsx", ".ods", ".pdf", ".svg",
];

/// What to do when a map layer has a provider but no datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDatasource {
    /// Skip that layer and keep going
    #[default]
    Continue,
    /// Stop scanning the remaining layers and do not write the document
    Stop,
}

/// Immutable configuration shared by every project document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub providers: BTreeSet<String>,
    pub extensions: BTreeSet<String>,
    pub missing_datasource: MissingDatasource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            providers: DEFAULT_PROVIDERS.iter().map(ToString::to_string).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            missing_datasource: MissingDatasource::default(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from YAML; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| QdsmError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            QdsmError::ConfigParseFailed { reason, .. } => QdsmError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn is_whitelisted(&self, provider: &str) -> bool {
        self.providers.contains(provider)
    }

    /// Case-sensitive, `ext` includes the leading dot
    pub fn is_recognized_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    /// Whether the engine may rewrite the datasource `path` of `provider`
    pub fn is_rewritable(&self, provider: &str, path: &str) -> bool {
        self.is_whitelisted(provider)
            && crate::common::path_normalizer::extension_of(path)
                .is_some_and(|ext| self.is_recognized_extension(ext))
    }
}
