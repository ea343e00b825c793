//! Scene item discovery for publishing.
//!
//! `shotscan` looks at the open 3D scene and lists what could be published
//! from it: the scene file itself, root groups holding geometry, and render
//! layers whose images are already on disk.
//!
//! The host application and the template engine are both reached through
//! traits ([`SceneHost`], [`TemplateEngine`]) so the scan logic runs the same
//! against a live session, a recorded [`SceneSnapshot`], or test fakes.
//!
//! # Output Order
//!
//! ```text
//! work_file            (always exactly one, first)
//! mesh_group ...       (one per root group with a mesh, host order)
//! rendered_image ...   (one per render layer with a match on disk)
//! ```
//!
//! # Layer Names
//!
//! The default render layer is known internally as `defaultRenderLayer` but
//! renders out as `masterLayer`. [`canonical_layer_name`] rewrites every
//! occurrence of the former before the name is used as a template field.

mod config;
mod engine;
mod error;
mod host;
mod item;
mod scan;

pub use config::{ScanConfig, DEFAULT_RENDER_TEMPLATE, DEFAULT_WORK_TEMPLATE};
pub use engine::{MockTemplateEngine, TemplateEngine};
pub use error::ScanError;
pub use host::{GroupSnapshot, NodeId, NodeType, SceneHost, SceneSnapshot, SnapshotError};
pub use item::{types, Item};
pub use scan::{
    canonical_layer_name, normalize_lexically, render_fields, scan_scene, scene_base_name, scene_file_name,
    SceneScanner, DEFAULT_LAYER, LAYER_NAME_FIELD, MASTER_LAYER, SCENE_NAME_FIELD, VERSION_FIELD,
};
