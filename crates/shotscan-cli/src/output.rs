//! Rendering scan results.
//!
//! Text output is one line per item. JSON and YAML serialize the item list
//! as-is, which is what a publish UI or another tool would consume.

use clap::ValueEnum;
use serde::Serialize;
use shotscan::Item;
use thiserror::Error;

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Value of the `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per item
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
    /// YAML sequence
    Yaml,
}

/// Renders `items` in the requested format. The result ends with a newline.
pub fn render(items: &[Item], format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => Ok(to_text(items)),
        OutputFormat::Json => Ok(format!("{}\n", to_json(items)?)),
        OutputFormat::Yaml => to_yaml(items),
    }
}

fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn to_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, OutputError> {
    Ok(serde_yaml::to_string(data)?)
}

fn to_text(items: &[Item]) -> String {
    let width = items
        .iter()
        .map(|i| i.item_type.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for item in items {
        out.push_str(&format!("{:<width$}  {}", item.item_type, item.name));
        if let Some(path) = item.path() {
            out.push_str("  ");
            out.push_str(path);
        }
        out.push('\n');
    }
    out
}
