//! Path mapping table used to relocate datasources
//!
//! Plain text, one `source<sep>destination` pair per line. Lines are trimmed
//! and blank lines skipped; there is no header and no escaping, so the
//! separator cannot appear inside a path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::common::path_normalizer::{apply_swap, to_slash};
use crate::error::{QdsmError, Result, file_read_failed};

/// Default column separator of mapping tables
pub const DEFAULT_SEPARATOR: char = ';';

/// Loaded mapping of old absolute paths to new absolute paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapTable {
    entries: HashMap<String, String>,
}

impl SwapTable {
    /// Load a mapping table file
    ///
    /// The whole table is rejected on the first malformed line.
    pub fn load(path: &Path, separator: char) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| file_read_failed(path.display(), e))?;
        Self::parse(&content, separator, &path.display().to_string())
    }

    /// Parse table content; `origin` names the table in error messages
    pub fn parse(content: &str, separator: char, origin: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(separator).collect();
            let [source, destination] = fields.as_slice() else {
                return Err(QdsmError::MappingLineInvalid {
                    path: origin.to_string(),
                    line: number + 1,
                    content: line.to_string(),
                });
            };

            entries.insert(to_slash(source), to_slash(destination));
        }

        Ok(Self { entries })
    }

    /// Swapped location of `path`, or `path` itself in slash form
    pub fn apply(&self, path: &str) -> String {
        apply_swap(path, &self.entries)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for SwapTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(source, destination)| (to_slash(&source), to_slash(&destination)))
                .collect(),
        }
    }
}
