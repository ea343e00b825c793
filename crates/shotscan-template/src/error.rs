//! Error types for the template crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading, applying, or searching templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template configuration could not be parsed.
    #[error("invalid template configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Reading a configuration file or walking a directory failed.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No template is registered under the requested name.
    #[error("template '{name}' is not registered")]
    NotFound { name: String },

    /// A template definition references a key that was never declared.
    #[error("template '{template}' references undeclared key '{key}'")]
    UnknownKey { template: String, key: String },

    /// A template definition is malformed.
    #[error("template '{template}' is malformed: {message}")]
    Syntax { template: String, message: String },

    /// A key declares a format spec this crate does not understand.
    #[error("key '{key}' has unsupported format_spec '{spec}'")]
    InvalidFormatSpec { key: String, spec: String },

    /// A path does not conform to the template's pattern.
    #[error("path '{path}' does not match template '{template}'")]
    NoMatch { template: String, path: String },

    /// Applying fields failed because a key had no value and no default.
    #[error("template '{template}' needs a value for '{key}'")]
    MissingField { template: String, key: String },

    /// A value cannot be represented by a key.
    #[error("value '{value}' is not valid for key '{key}'")]
    InvalidValue { key: String, value: String },

    /// A generated pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl TemplateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(key: &str, value: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
