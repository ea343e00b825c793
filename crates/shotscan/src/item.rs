//! The items a scan hands back to the publish UI.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known item types. Any other string is passed through untouched.
pub mod types {
    /// The open scene file itself.
    pub const WORK_FILE: &str = "work_file";
    /// A root group containing geometry.
    pub const MESH_GROUP: &str = "mesh_group";
    /// Images already rendered for a render layer.
    pub const RENDERED_IMAGE: &str = "rendered_image";
}

/// One publishable candidate.
///
/// # Example
///
/// ```
/// use shotscan::Item;
///
/// let item = Item::new("rendered_image", "masterLayer")
///     .with_param("path", "/proj/render/masterLayer/shot010.%04d.exr");
/// assert!(item.selected);
/// assert!(!item.required);
/// assert_eq!(item.path(), Some("/proj/render/masterLayer/shot010.%04d.exr"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub item_type: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial selection state in the UI.
    #[serde(default = "default_selected")]
    pub selected: bool,

    /// Required items cannot be deselected.
    #[serde(default)]
    pub required: bool,

    /// Passed through to the downstream publish steps.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_params: BTreeMap<String, Value>,
}

fn default_selected() -> bool {
    true
}

impl Item {
    pub fn new(item_type: impl Into<String>, name: impl Into<String>) -> Self {
        Item {
            item_type: item_type.into(),
            name: name.into(),
            description: None,
            selected: true,
            required: false,
            other_params: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.other_params.insert(key.into(), value.into());
        self
    }

    /// Attaches a filesystem path under `other_params.path`.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_param("path", path.to_string_lossy().into_owned())
    }

    /// The `other_params.path` entry, if it is a string.
    pub fn path(&self) -> Option<&str> {
        self.other_params.get("path").and_then(Value::as_str)
    }

    pub fn is_type(&self, item_type: &str) -> bool {
        self.item_type == item_type
    }
}
