//! Path templates with typed fields.
//!
//! A template is a path pattern such as
//! `{Shot}/render/{maya.layer_name}/{name}.{SEQ}.exr`. This crate supports the
//! three things a pipeline does with one:
//!
//! - **Extract**: parse the fields out of a concrete path that matches exactly
//! - **Apply**: build a path from a field set, falling back to key defaults
//! - **Search**: find paths on disk that fit the template when only some
//!   fields are known, with the rest acting as wildcards
//!
//! # Quick Start
//!
//! ```rust
//! use shotscan_template::{TemplateRegistry, FieldValue};
//!
//! let registry = TemplateRegistry::from_yaml_str(r#"
//! root: /proj
//! keys:
//!   name: { type: str }
//!   version: { type: int, format_spec: "03" }
//! paths:
//!   work: "work/{name}_v{version}.ma"
//! "#).unwrap();
//!
//! let work = registry.template("work").unwrap();
//! let fields = work.extract_fields("/proj/work/shot010_v003.ma").unwrap();
//! assert_eq!(fields["version"], FieldValue::Int(3));
//! ```
//!
//! # Key Types
//!
//! | Type | Matches | Notes |
//! |------|---------|-------|
//! | `str` | one path component's worth of text | `choices`, `filter_by` narrow it |
//! | `int` | digits | `format_spec: "0N"` zero-pads |
//! | `sequence` | frame numbers or `%04d` / `####` / `@@@@` | collapsed by [`abstract_paths`] |

mod error;
mod finder;
mod key;
mod registry;
mod template;
mod value;

pub use error::{Result, TemplateError};
pub use finder::{abstract_paths, find_paths};
pub use key::{FilterBy, Key, KeyKind, KeySpec};
pub use registry::{PathEntry, RegistryConfig, TemplateRegistry};
pub use template::Template;
pub use value::{fields, FieldValue, Fields};
