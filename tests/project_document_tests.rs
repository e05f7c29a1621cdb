//! Engine integration tests through the library API

mod common;

use std::sync::Arc;

use common::{Layer, TestWorkspace};
use qdsm::common::path_normalizer::to_relative;
use qdsm::config::{EngineConfig, MissingDatasource};
use qdsm::domain::PathMode;
use qdsm::project::{ProjectCollection, ProjectDocument, SourceFilter, SwapTable};
use qdsm::ui::SilentProgressReporter;

#[test]
fn test_windows_style_paths_are_slash_normalized() {
    let workspace = TestWorkspace::new();
    let project = workspace.write_project(
        "maps/p.qgs",
        "false",
        &[],
        &[Layer::ogr(r"..\data\a.shp", "a")],
    );

    let mut doc = ProjectDocument::new(&project);
    doc.read().expect("Read should succeed");

    assert_eq!(doc.sources()[0].path, workspace.abs("data/a.shp"));
}

#[test]
fn test_project_opened_through_relative_path_round_trips() {
    let workspace = TestWorkspace::new();
    let xml = common::project_xml(
        "false",
        &["./img/logo.png"],
        &[Layer::ogr("../data/a.shp", "a")],
    );
    workspace.write_file("maps/city.qgs", &xml);

    let cwd = std::env::current_dir().expect("Failed to get current directory");
    let cwd = cwd.to_string_lossy().replace('\\', "/");
    let relative = to_relative(&workspace.abs("maps/city.qgs"), &cwd);

    let mut doc = ProjectDocument::new(&relative);
    assert!(doc.path().is_absolute());

    doc.convert_to_absolute().expect("Conversion should succeed");
    assert!(
        workspace
            .read_file("maps/city.qgs")
            .contains(&format!("<datasource>{}</datasource>", workspace.abs("data/a.shp")))
    );
    assert!(doc.iter().all(|src| src.path.starts_with(&workspace.root())));

    doc.convert_to_relative().expect("Conversion should succeed");
    assert_eq!(workspace.read_file("maps/city.qgs"), xml);
}

#[test]
fn test_other_drive_stays_absolute_when_converting_to_relative() {
    let workspace = TestWorkspace::new();
    let project = workspace.write_project(
        "maps/p.qgs",
        "true",
        &[],
        &[Layer::ogr("D:/gis/a.shp", "a")],
    );

    let mut doc = ProjectDocument::new(&project);
    doc.convert_to_relative().expect("Conversion should succeed");

    assert!(
        workspace
            .read_file("maps/p.qgs")
            .contains("<datasource>D:/gis/a.shp</datasource>")
    );
    assert_eq!(doc.path_mode(), PathMode::Relative);
}

#[test]
fn test_same_folder_source_gets_dot_prefix() {
    let workspace = TestWorkspace::new();
    let absolute = workspace.abs("maps/a.geojson");
    let project = workspace.write_project(
        "maps/p.qgs",
        "true",
        &[],
        &[Layer::ogr(&absolute, "a")],
    );

    let mut doc = ProjectDocument::new(&project);
    doc.convert_to_relative().expect("Conversion should succeed");
    assert!(
        workspace
            .read_file("maps/p.qgs")
            .contains("<datasource>./a.geojson</datasource>")
    );

    doc.read().expect("Read should succeed");
    assert_eq!(doc.sources()[0].path, absolute);
}

#[test]
fn test_xml_special_characters_survive_rewrite() {
    let workspace = TestWorkspace::new();
    let project = workspace.write_project(
        "maps/p.qgs",
        "false",
        &[],
        &[Layer::ogr("../data/R&amp;D.shp|subset=&quot;a&quot; &lt; 3", "rd")],
    );

    let mut doc = ProjectDocument::new(&project);
    doc.convert_to_absolute().expect("Conversion should succeed");

    let source = &doc.sources()[0];
    assert_eq!(source.path, workspace.abs("data/R&D.shp"));
    assert_eq!(source.subset_filter, "subset=\"a\" < 3");

    let mut reread = ProjectDocument::new(&project);
    reread.read().expect("Read should succeed");
    assert_eq!(reread.sources()[0].path, source.path);
    assert_eq!(reread.sources()[0].subset_filter, source.subset_filter);
}

#[test]
fn test_relocate_with_preloaded_table() {
    let workspace = TestWorkspace::new();
    let project = workspace.write_project(
        "maps/p.qgs",
        "true",
        &["/old/logo.svg"],
        &[Layer::gdal("/old/dem.tif", "dem")],
    );
    let swap: SwapTable = [
        ("/old/logo.svg".to_string(), "/new/logo.svg".to_string()),
        ("/old/dem.tif".to_string(), "/new/dem.tif".to_string()),
    ]
    .into_iter()
    .collect();

    let mut doc = ProjectDocument::new(&project);
    doc.relocate_with(&swap, false).expect("Relocation should succeed");

    let content = workspace.read_file("maps/p.qgs");
    assert!(content.contains(r#"file="/new/logo.svg""#));
    assert!(content.contains("<datasource>/new/dem.tif</datasource>"));
    assert_eq!(doc.path_mode(), PathMode::Absolute);
}

#[test]
fn test_stop_policy_through_collection() {
    let workspace = TestWorkspace::new();
    let mut xml = common::project_xml("false", &[], &[Layer::ogr("../a.shp", "a")]);
    xml = xml.replace(
        "</projectlayers>",
        "<maplayer type=\"vector\"><provider>ogr</provider></maplayer></projectlayers>",
    );
    workspace.write_file("maps/p.qgs", &xml);

    let config = EngineConfig {
        missing_datasource: MissingDatasource::Stop,
        ..EngineConfig::default()
    };
    let mut projects = ProjectCollection::discover(&[workspace.as_path()], Arc::new(config))
        .expect("Discovery should succeed");
    projects
        .convert_to_absolute(&mut SilentProgressReporter)
        .expect("Conversion should succeed");

    assert_eq!(workspace.read_file("maps/p.qgs"), xml);
}

#[test]
fn test_unique_sources_across_projects() {
    let workspace = TestWorkspace::new();
    workspace.touch("data/a.shp");
    workspace.write_project("one/p.qgs", "false", &[], &[Layer::ogr("../data/a.shp", "a")]);
    workspace.write_project(
        "two/q.qgs",
        "true",
        &[],
        &[
            Layer::ogr(&workspace.abs("data/a.shp"), "a"),
            Layer::ogr("../data/b.shp", "b"),
        ],
    );

    let mut projects =
        ProjectCollection::discover(&[workspace.as_path()], Arc::new(EngineConfig::default()))
            .expect("Discovery should succeed");
    projects
        .read(&mut SilentProgressReporter)
        .expect("Read should succeed");

    let sources = projects.unique_sources();
    assert_eq!(sources.len(), 2);

    let mut out = Vec::new();
    sources
        .dump(&mut out, '\t', &[SourceFilter::Missing])
        .expect("Dump should succeed");
    let text = String::from_utf8(out).expect("Dump is UTF-8");
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains(&workspace.abs("data/b.shp")));
}
