//! Loading templates from YAML configuration.
//!
//! ```yaml
//! root: /proj
//! keys:
//!   Shot: { type: str }
//!   version: { type: int, format_spec: "03" }
//! paths:
//!   shot_work: "{Shot}/work/{Shot}_v{version}.ma"
//!   shot_render:
//!     definition: "{Shot}/render/{Shot}.exr"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Result, TemplateError};
use crate::key::{Key, KeySpec};
use crate::template::Template;

/// Raw registry configuration as read from YAML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Directory every definition is relative to.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub keys: BTreeMap<String, KeySpec>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathEntry>,
}

/// A `paths` entry: either a bare definition or a mapping with one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    Definition(String),
    Detailed { definition: String },
}

impl PathEntry {
    pub fn definition(&self) -> &str {
        match self {
            PathEntry::Definition(d) => d,
            PathEntry::Detailed { definition } => definition,
        }
    }
}

impl RegistryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
        Self::from_yaml_str(&text)
    }
}

/// Named templates sharing one key set.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    root: Option<PathBuf>,
    keys: BTreeMap<String, Key>,
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Validates every key and parses every template in `config`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let keys = config
            .keys
            .iter()
            .map(|(name, spec)| -> Result<(String, Key)> {
                Ok((name.clone(), Key::from_spec(name, spec)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let root = config.root.as_deref();
        let templates = config
            .paths
            .iter()
            .map(|(name, entry)| -> Result<(String, Template)> {
                let template = Template::parse(name, entry.definition(), &keys, root)?;
                debug!("registered template '{}': {}", name, template.definition());
                Ok((name.clone(), template))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(TemplateRegistry {
            root: config.root.clone(),
            keys,
            templates,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::from_config(&RegistryConfig::from_yaml_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&RegistryConfig::load(path)?)
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Like [`get`](Self::get), but a missing template is an error.
    pub fn template(&self, name: &str) -> Result<&Template> {
        self.get(name).ok_or_else(|| TemplateError::NotFound {
            name: name.to_string(),
        })
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
