//! Error types for scene scanning.

use std::path::PathBuf;

use shotscan_template::TemplateError;

/// Errors that abort a scan.
///
/// Every variant is a precondition failure that retrying cannot fix; no items
/// are returned alongside any of them.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The host has no saved scene open.
    #[error("Please save your file before publishing.")]
    NoSceneOpen,

    /// A template name is not registered with the engine.
    #[error("Template '{name}' is not registered.")]
    TemplateNotFound { name: String },

    /// The open scene does not follow the naming convention of a template.
    #[error("Scene '{}' does not match template '{template}'.", .path.display())]
    TemplateMismatch {
        template: String,
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    /// Extraction succeeded but the expected field is absent.
    #[error("Template '{template}' did not yield a '{field}' field.")]
    MissingField { template: String, field: String },

    /// Any other failure reported by the template engine.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl ScanError {
    /// Maps a template lookup failure onto the scan taxonomy.
    pub(crate) fn lookup(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound { name } => ScanError::TemplateNotFound { name },
            other => ScanError::Template(other),
        }
    }
}
