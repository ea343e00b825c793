//! The scan pipeline.
//!
//! A scan runs five steps in order and returns one ordered item list:
//!
//! 1. locate the open scene (fatal if unsaved)
//! 2. emit the primary `work_file` item
//! 3. emit a `mesh_group` item per root group holding geometry
//! 4. resolve the scene's `version` through the work template (fatal on failure)
//! 5. reconcile each render layer against the render template, best effort
//!
//! Steps 1 and 4 are all-or-nothing: if either fails, no items are returned.
//! Step 5 never fails a scan because of a single layer.

use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};
use shotscan_template::{FieldValue, Fields};

use crate::config::ScanConfig;
use crate::engine::TemplateEngine;
use crate::error::ScanError;
use crate::host::SceneHost;
use crate::item::{types, Item};

/// Internal name of the default render layer.
pub const DEFAULT_LAYER: &str = "defaultRenderLayer";

/// Name the default layer renders out as.
pub const MASTER_LAYER: &str = "masterLayer";

/// Render-template field bound to the scene's base name.
pub const SCENE_NAME_FIELD: &str = "name";

/// Render-template field bound to the canonical layer name.
pub const LAYER_NAME_FIELD: &str = "maya.layer_name";

/// Work-template field holding the scene version.
pub const VERSION_FIELD: &str = "version";

/// Rewrites the default layer's internal name to its public alias.
///
/// This is a plain substring replacement: occurrences inside longer names are
/// rewritten too.
///
/// ```
/// use shotscan::canonical_layer_name;
///
/// assert_eq!(canonical_layer_name("defaultRenderLayer"), "masterLayer");
/// assert_eq!(canonical_layer_name("defaultRenderLayerFoo"), "masterLayerFoo");
/// assert_eq!(canonical_layer_name("fx"), "fx");
/// ```
pub fn canonical_layer_name(layer: &str) -> String {
    layer.replace(DEFAULT_LAYER, MASTER_LAYER)
}

/// File name of `path`, or an empty string if it has none.
pub fn scene_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Everything in the file name before the first `.`.
///
/// ```
/// use std::path::Path;
/// use shotscan::scene_base_name;
///
/// assert_eq!(scene_base_name(Path::new("/p/shot010_v003.ma")), "shot010_v003");
/// assert_eq!(scene_base_name(Path::new("/p/shot010.v003.ma")), "shot010");
/// ```
pub fn scene_base_name(path: &Path) -> String {
    let file_name = scene_file_name(path);
    match file_name.split_once('.') {
        Some((base, _)) => base.to_string(),
        None => file_name,
    }
}

/// Folds `.` and `..` components without touching the filesystem.
///
/// Symlinks are not resolved, so `a/link/..` becomes `a`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // Popping past the root is a no-op, as with `/..`.
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// The partial field set searched for one render layer.
pub fn render_fields(scene_base: &str, layer: &str) -> Fields {
    Fields::from([
        (SCENE_NAME_FIELD.to_string(), FieldValue::from(scene_base)),
        (LAYER_NAME_FIELD.to_string(), FieldValue::from(layer)),
    ])
}

/// Runs the scan pipeline against a host and a template engine.
///
/// # Example
///
/// ```
/// use shotscan::{MockTemplateEngine, NodeType, SceneScanner, SceneSnapshot};
/// use shotscan_template::{fields, FieldValue};
///
/// let scene = SceneSnapshot::new()
///     .with_path("/proj/shot010_v003.ma")
///     .with_group("|grp1", [NodeType::Mesh])
///     .with_render_layer("defaultRenderLayer");
///
/// let engine = MockTemplateEngine::new()
///     .with_fields("maya_shot_work", "/proj/shot010_v003.ma", fields([("version", FieldValue::Int(3))]))
///     .with_matches(
///         "maya_shot_render",
///         fields([("name", "shot010_v003"), ("maya.layer_name", "masterLayer")]),
///         ["/proj/render/masterLayer.exr"],
///     );
///
/// let items = SceneScanner::new(&scene, &engine).scan().unwrap();
/// let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
/// assert_eq!(names, ["shot010_v003.ma", "|grp1", "masterLayer"]);
/// ```
pub struct SceneScanner<'a, H: ?Sized, E> {
    host: &'a H,
    engine: &'a E,
    config: ScanConfig,
}

impl<'a, H, E> SceneScanner<'a, H, E>
where
    H: SceneHost + ?Sized,
    E: TemplateEngine,
{
    /// Creates a scanner using the default template names.
    pub fn new(host: &'a H, engine: &'a E) -> Self {
        SceneScanner {
            host,
            engine,
            config: ScanConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs all steps and returns the items in publish-UI order.
    pub fn scan(&self) -> Result<Vec<Item>, ScanError> {
        let scene = self.locate()?;
        info!("scanning scene {}", scene.display());

        let mut items = vec![self.primary_item(&scene)];
        items.extend(self.scan_groups());

        let version = self.resolve_version(&scene)?;
        info!("scene version is {version}");

        items.extend(self.reconcile_render_layers(&scene)?);
        debug!("scan produced {} item(s)", items.len());
        Ok(items)
    }

    /// Absolute path of the open scene.
    pub fn locate(&self) -> Result<PathBuf, ScanError> {
        let path = self
            .host
            .current_scene_path()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ScanError::NoSceneOpen)?;
        let absolute = std::path::absolute(&path).unwrap_or(path);
        Ok(normalize_lexically(&absolute))
    }

    /// The `work_file` item for the scene itself.
    pub fn primary_item(&self, scene: &Path) -> Item {
        Item::new(types::WORK_FILE, scene_file_name(scene))
    }

    /// One `mesh_group` item per root group with a mesh beneath it.
    pub fn scan_groups(&self) -> Vec<Item> {
        self.host
            .root_group_nodes()
            .into_iter()
            .filter(|node| {
                let keep = self.host.has_mesh_descendant(node);
                debug!("root group {node}: has mesh = {keep}");
                keep
            })
            .map(|node| Item::new(types::MESH_GROUP, node.path()))
            .collect()
    }

    /// The `version` field of the scene path under the work template.
    pub fn resolve_version(&self, scene: &Path) -> Result<FieldValue, ScanError> {
        let name = &self.config.work_template;
        let template = self.engine.template(name).map_err(ScanError::lookup)?;
        let mut fields = self
            .engine
            .extract_fields(&template, scene)
            .map_err(|source| ScanError::TemplateMismatch {
                template: name.clone(),
                path: scene.to_path_buf(),
                source,
            })?;

        fields
            .remove(VERSION_FIELD)
            .ok_or_else(|| ScanError::MissingField {
                template: name.clone(),
                field: VERSION_FIELD.to_string(),
            })
    }

    /// One `rendered_image` item per render layer with something on disk.
    ///
    /// Only a missing render template is fatal. A layer whose search comes
    /// back empty, or fails, is skipped.
    pub fn reconcile_render_layers(&self, scene: &Path) -> Result<Vec<Item>, ScanError> {
        let template = self
            .engine
            .template(&self.config.render_template)
            .map_err(ScanError::lookup)?;
        let scene_base = scene_base_name(scene);

        let mut items = Vec::new();
        for layer in self.host.render_layers() {
            let layer = canonical_layer_name(&layer);
            let fields = render_fields(&scene_base, &layer);

            let paths = match self.engine.find_paths(&template, &fields) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!("render layer '{layer}': search failed: {e}");
                    continue;
                }
            };

            // No disambiguation between several matches: the first one wins.
            let Some(path) = paths.into_iter().next() else {
                debug!("render layer '{layer}': nothing on disk");
                continue;
            };
            debug!("render layer '{layer}': {}", path.display());
            items.push(Item::new(types::RENDERED_IMAGE, layer).with_path(&path));
        }
        Ok(items)
    }
}

/// Scans with an explicit configuration.
pub fn scan_scene<H, E>(host: &H, engine: &E, config: &ScanConfig) -> Result<Vec<Item>, ScanError>
where
    H: SceneHost + ?Sized,
    E: TemplateEngine,
{
    SceneScanner::new(host, engine)
        .with_config(config.clone())
        .scan()
}
