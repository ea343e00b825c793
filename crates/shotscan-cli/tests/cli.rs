//! Integration tests for the `shotscan` command.

use std::fs;
use std::path::Path;

use clap::Parser;
use log::LevelFilter;
use shotscan_cli::{run, scan, Cli, OutputFormat};
use tempfile::TempDir;

const TEMPLATES: &str = r#"
keys:
  Shot: { type: str }
  name: { type: str }
  version: { type: int, format_spec: "03" }
  SEQ: { type: sequence, format_spec: "04" }
  maya.layer_name: { type: str }
paths:
  maya_shot_work: "{Shot}/work/{name}_v{version}.ma"
  maya_shot_render: "{Shot}/render/{maya.layer_name}/{name}.{SEQ}.exr"
  comp_render: "{Shot}/comp/{maya.layer_name}/{name}.{SEQ}.exr"
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let project = Project { dir };
        project.write("templates.yml", TEMPLATES);
        project.touch("proj/shot010/work/shot010_v003.ma");
        project
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn touch(&self, rel: &str) {
        self.write(rel, "");
    }

    fn scene(&self, scene_path: Option<&str>) {
        let mut yaml = String::new();
        if let Some(p) = scene_path {
            yaml.push_str(&format!("path: {}\n", self.root().join(p).display()));
        }
        yaml.push_str(
            "groups:\n  - path: \"|grp1\"\n    descendants: [mesh]\n  - path: \"|grp2\"\n",
        );
        yaml.push_str("render_layers: [defaultRenderLayer, fx]\n");
        self.write("scene.yaml", &yaml);
    }

    fn cli(&self, extra: &[&str]) -> Cli {
        let scene = self.root().join("scene.yaml");
        let templates = self.root().join("templates.yml");
        let root = self.root().join("proj");
        let mut args = vec![
            "shotscan".to_string(),
            "--scene".to_string(),
            scene.display().to_string(),
            "--templates".to_string(),
            templates.display().to_string(),
            "--root".to_string(),
            root.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::parse_from(args)
    }
}

#[test]
fn defaults() {
    let cli = Cli::parse_from(["shotscan", "--scene", "s.yaml", "--templates", "t.yml"]);
    assert_eq!(cli.output, OutputFormat::Text);
    assert_eq!(cli.work_template, "maya_shot_work");
    assert_eq!(cli.render_template, "maya_shot_render");
    assert_eq!(cli.log_level(), LevelFilter::Warn);
    assert!(cli.root.is_none());

    let cli = Cli::parse_from(["shotscan", "--scene", "s", "--templates", "t", "-vv"]);
    assert_eq!(cli.log_level(), LevelFilter::Debug);
}

#[test]
fn scans_project_on_disk() {
    let project = Project::new();
    project.scene(Some("proj/shot010/work/shot010_v003.ma"));
    project.touch("proj/shot010/render/masterLayer/shot010_v003.0001.exr");
    project.touch("proj/shot010/render/masterLayer/shot010_v003.0002.exr");

    let items = scan(&project.cli(&[])).unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["shot010_v003.ma", "|grp1", "masterLayer"]);
    assert!(items[2]
        .path()
        .unwrap()
        .ends_with("render/masterLayer/shot010_v003.%04d.exr"));
}

#[test]
fn json_output() {
    let project = Project::new();
    project.scene(Some("proj/shot010/work/shot010_v003.ma"));

    let out = run(&project.cli(&["--output", "json"])).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "work_file");
    assert_eq!(items[1]["type"], "mesh_group");
}

#[test]
fn render_template_override() {
    let project = Project::new();
    project.scene(Some("proj/shot010/work/shot010_v003.ma"));
    project.touch("proj/shot010/comp/fx/shot010_v003.0001.exr");

    let items = scan(&project.cli(&["--render-template", "comp_render"])).unwrap();
    assert_eq!(items.last().map(|i| i.name.as_str()), Some("fx"));
}

#[test]
fn unsaved_scene_is_an_error() {
    let project = Project::new();
    project.scene(None);

    let err = run(&project.cli(&[])).unwrap_err();
    assert!(format!("{err:#}").contains("save your file"));
}

#[test]
fn missing_templates_file_is_an_error() {
    let project = Project::new();
    project.scene(Some("proj/shot010/work/shot010_v003.ma"));
    fs::remove_file(project.root().join("templates.yml")).unwrap();

    let err = run(&project.cli(&[])).unwrap_err();
    assert!(format!("{err:#}").contains("loading templates"));
}
