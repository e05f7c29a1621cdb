//! Common test utilities for qdsm integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch folder holding project files and datasets
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Canonical, slash-separated path of the workspace root
    pub path: PathBuf,
}

/// One `<maplayer>` of a generated project
#[allow(dead_code)]
pub struct Layer<'a> {
    pub kind: &'a str,
    pub provider: &'a str,
    pub datasource: &'a str,
    pub name: &'a str,
}

#[allow(dead_code)]
impl<'a> Layer<'a> {
    pub fn ogr(datasource: &'a str, name: &'a str) -> Self {
        Self {
            kind: "vector",
            provider: "ogr",
            datasource,
            name,
        }
    }

    pub fn gdal(datasource: &'a str, name: &'a str) -> Self {
        Self {
            kind: "raster",
            provider: "gdal",
            datasource,
            name,
        }
    }
}

/// Build the XML of a project file
///
/// `absolute` is the `Paths/Absolute` declaration; datasources and picture
/// paths are inserted as given, so they must already be XML-escaped.
#[allow(dead_code)]
pub fn project_xml(absolute: &str, pictures: &[&str], layers: &[Layer<'_>]) -> String {
    let pictures: String = pictures
        .iter()
        .map(|file| format!("\n      <ComposerPicture file=\"{file}\" frame=\"false\"/>"))
        .collect();
    let layers: String = layers
        .iter()
        .map(|layer| {
            format!(
                r#"
    <maplayer type="{}" hasScaleBasedVisibilityFlag="0">
      <id>{}_1</id>
      <datasource>{}</datasource>
      <layername>{}</layername>
      <provider encoding="UTF-8">{}</provider>
    </maplayer>"#,
                layer.kind, layer.name, layer.datasource, layer.name, layer.provider
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE qgis PUBLIC 'http://mrcc.com/qgis.dtd' 'SYSTEM'>
<qgis projectname="test" version="2.18.20">
  <title>test</title>
  <!-- print layouts -->
  <Composer title="A4">
    <Composition paperHeight="210" paperWidth="297">{pictures}
    </Composition>
  </Composer>
  <projectlayers>{layers}
  </projectlayers>
  <properties>
    <Paths>
      <Absolute type="bool">{absolute}</Absolute>
    </Paths>
  </properties>
</qgis>
"#
    )
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let canonical = dunce::canonicalize(temp.path()).expect("Failed to canonicalize");
        let path = PathBuf::from(canonical.to_string_lossy().replace('\\', "/"));
        Self { temp, path }
    }

    /// Root path as a slash-separated string
    #[allow(dead_code)]
    pub fn root(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Absolute slash-separated path of `relative` inside the workspace
    #[allow(dead_code)]
    pub fn abs(&self, relative: &str) -> String {
        format!("{}/{}", self.root(), relative)
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Write a project file in workspace
    #[allow(dead_code)]
    pub fn write_project(
        &self,
        path: &str,
        absolute: &str,
        pictures: &[&str],
        layers: &[Layer<'_>],
    ) -> PathBuf {
        self.write_file(path, &project_xml(absolute, pictures, layers))
    }

    /// Create an empty dataset file so that sources referencing it exist
    #[allow(dead_code)]
    pub fn touch(&self, path: &str) {
        self.write_file(path, "");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Path of a file or folder inside the workspace
    #[allow(dead_code)]
    pub fn join(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }

    #[allow(dead_code)]
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("maps/a.qgs", "<qgis/>");
        assert!(workspace.file_exists("maps/a.qgs"));
        assert_eq!(workspace.read_file("maps/a.qgs"), "<qgis/>");
    }
}
