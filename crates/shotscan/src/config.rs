//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Template used to parse the open scene's path.
pub const DEFAULT_WORK_TEMPLATE: &str = "maya_shot_work";

/// Template searched for rendered images.
pub const DEFAULT_RENDER_TEMPLATE: &str = "maya_shot_render";

/// The template names a scan resolves against.
///
/// ```
/// use shotscan::ScanConfig;
///
/// let config: ScanConfig = serde_yaml::from_str("render_template: comp_render").unwrap();
/// assert_eq!(config.work_template, "maya_shot_work");
/// assert_eq!(config.render_template, "comp_render");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub work_template: String,
    pub render_template: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            work_template: DEFAULT_WORK_TEMPLATE.to_string(),
            render_template: DEFAULT_RENDER_TEMPLATE.to_string(),
        }
    }
}

impl ScanConfig {
    pub fn with_work_template(mut self, name: impl Into<String>) -> Self {
        self.work_template = name.into();
        self
    }

    pub fn with_render_template(mut self, name: impl Into<String>) -> Self {
        self.render_template = name.into();
        self
    }
}
