//! Common file system operations with unified error handling

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::common::path_normalizer::to_slash;
use crate::error::{QdsmError, Result, file_write_failed};

/// Extension of QGIS project files
pub const PROJECT_EXTENSION: &str = ".qgs";

/// Replace `path` with `content` atomically
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over `path`, so readers never see a half-written project. The
/// permissions of an existing file are carried over.
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| file_write_failed(path.display(), e))?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| file_write_failed(path.display(), e))?;

    if let Ok(metadata) = fs::metadata(path) {
        if let Err(e) = fs::set_permissions(tmp.path(), metadata.permissions()) {
            debug!("Could not carry permissions over to {}: {}", path.display(), e);
        }
    }

    tmp.persist(path)
        .map_err(|e| file_write_failed(path.display(), e.error))?;
    Ok(())
}

/// Recursively find project files under `folders`
///
/// Roots are canonicalized so that every discovered path is absolute, which
/// keeps relative datasource resolution independent from the working
/// directory. The result is sorted and free of duplicates.
pub fn find_project_files<P: AsRef<Path>>(folders: &[P]) -> Result<Vec<PathBuf>> {
    let mut projects = Vec::new();

    for folder in folders {
        let folder = folder.as_ref();
        let root = dunce::canonicalize(folder).map_err(|_| QdsmError::FolderNotFound {
            path: folder.display().to_string(),
        })?;

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| QdsmError::IoError {
                message: format!("Failed to walk {}: {}", root.display(), e),
            })?;

            let is_project = entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(PROJECT_EXTENSION));
            if is_project {
                projects.push(PathBuf::from(to_slash(&entry.path().to_string_lossy())));
            }
        }
    }

    projects.sort();
    projects.dedup();
    Ok(projects)
}
