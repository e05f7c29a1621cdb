//! Source domain types
//!
//! A [`SourceRecord`] is one datasource reference discovered in a project
//! file, either a print-layout resource or a map-layer datasource.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::Serialize;

use crate::common::path_normalizer::extension_of;

/// One discovered datasource reference
///
/// Equality, hashing and ordering only look at `path`, compared
/// case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    /// Datasource location in slash form; absolute when the engine could
    /// normalize it, otherwise exactly as declared
    pub path: String,

    /// Found under the print-layout resource subtree
    pub is_composer_resource: bool,

    /// Declared provider (ogr, gdal, postgres, wms...), map layers only
    pub provider: Option<String>,

    /// Layer type attribute (vector, raster...), map layers only
    pub layer_kind: Option<String>,

    /// Layer name shown in the table of contents, map layers only
    pub layer_name: Option<String>,

    /// Filter split out of a `path|filter` datasource
    pub subset_filter: String,
}

impl SourceRecord {
    /// Record for a print-layout resource
    pub fn composer(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_composer_resource: true,
            provider: None,
            layer_kind: None,
            layer_name: None,
            subset_filter: String::new(),
        }
    }

    /// Record for a map-layer datasource
    pub fn map_layer(
        path: impl Into<String>,
        provider: impl Into<String>,
        layer_kind: Option<String>,
        layer_name: Option<String>,
        subset_filter: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            is_composer_resource: false,
            provider: Some(provider.into()),
            layer_kind,
            layer_name,
            subset_filter: subset_filter.into(),
        }
    }

    /// Whether the datasource currently exists on disk
    ///
    /// Checked live on every call.
    pub fn exists(&self) -> bool {
        Path::new(&self.path).exists()
    }

    /// File extension of the datasource path, leading dot included
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.path)
    }

    fn sort_key(&self) -> String {
        self.path.to_lowercase()
    }
}

impl PartialEq for SourceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for SourceRecord {}

impl Hash for SourceRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for SourceRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl std::fmt::Display for SourceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}
