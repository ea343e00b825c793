//! Read-only access to the host application's open scene.
//!
//! The scanner never talks to a 3D application directly. Everything it needs
//! goes through [`SceneHost`], so a live integration and a recorded
//! [`SceneSnapshot`] are interchangeable.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Fully-qualified path of a scene graph node, e.g. `|grp1|geo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(path: impl Into<String>) -> Self {
        NodeId(path.into())
    }

    /// The display path of this node.
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node type tags the scanner asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Mesh,
    Transform,
    Camera,
    Light,
    RenderLayer,
    #[serde(other)]
    Other,
}

/// Scene queries the scanner depends on.
///
/// All methods are read-only.
pub trait SceneHost {
    /// Path of the open scene, or `None` if it was never saved.
    fn current_scene_path(&self) -> Option<PathBuf>;

    /// Top-level nodes (no parent), in the host's enumeration order.
    fn root_group_nodes(&self) -> Vec<NodeId>;

    /// Whether the subtree under `node` contains a node of `node_type`.
    fn has_descendant_of_type(&self, node: &NodeId, node_type: NodeType) -> bool;

    /// Names of every node of `node_type` in the scene.
    fn nodes_of_type(&self, node_type: NodeType) -> Vec<String>;

    fn has_mesh_descendant(&self, node: &NodeId) -> bool {
        self.has_descendant_of_type(node, NodeType::Mesh)
    }

    fn render_layers(&self) -> Vec<String> {
        self.nodes_of_type(NodeType::RenderLayer)
    }
}

/// Errors loading a [`SceneSnapshot`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read scene snapshot '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene snapshot: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A root group and the node types found beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub path: String,
    #[serde(default)]
    pub descendants: Vec<NodeType>,
}

/// A static description of a scene that implements [`SceneHost`].
///
/// Snapshots are written in YAML (or JSON, which YAML accepts):
///
/// ```yaml
/// path: /proj/shot010/work/maya/shot010_v003.ma
/// groups:
///   - path: "|grp1"
///     descendants: [transform, mesh]
///   - path: "|grp2"
/// render_layers: [defaultRenderLayer, fx]
/// ```
///
/// They double as an in-memory fake for tests:
///
/// ```
/// use shotscan::{NodeType, SceneHost, SceneSnapshot};
///
/// let scene = SceneSnapshot::new()
///     .with_path("/proj/shot010_v003.ma")
///     .with_group("|grp1", [NodeType::Mesh])
///     .with_render_layer("fx");
///
/// let roots = scene.root_group_nodes();
/// assert!(scene.has_mesh_descendant(&roots[0]));
/// assert_eq!(scene.render_layers(), ["fx"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub render_layers: Vec<String>,
}

impl SceneSnapshot {
    /// An unsaved, empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_group<I>(mut self, path: impl Into<String>, descendants: I) -> Self
    where
        I: IntoIterator<Item = NodeType>,
    {
        self.groups.push(GroupSnapshot {
            path: path.into(),
            descendants: descendants.into_iter().collect(),
        });
        self
    }

    pub fn with_render_layer(mut self, name: impl Into<String>) -> Self {
        self.render_layers.push(name.into());
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    fn group(&self, node: &NodeId) -> Option<&GroupSnapshot> {
        self.groups.iter().find(|g| g.path == node.path())
    }
}

impl SceneHost for SceneSnapshot {
    fn current_scene_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn root_group_nodes(&self) -> Vec<NodeId> {
        self.groups.iter().map(|g| NodeId::new(&g.path)).collect()
    }

    fn has_descendant_of_type(&self, node: &NodeId, node_type: NodeType) -> bool {
        self.group(node)
            .is_some_and(|g| g.descendants.contains(&node_type))
    }

    // Snapshots only name render layers.
    fn nodes_of_type(&self, node_type: NodeType) -> Vec<String> {
        match node_type {
            NodeType::RenderLayer => self.render_layers.clone(),
            _ => Vec::new(),
        }
    }
}
