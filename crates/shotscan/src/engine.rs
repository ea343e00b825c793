//! The template collaborator.
//!
//! [`TemplateEngine`] is the narrow interface the scanner uses to parse the
//! scene path and to look for existing renders. [`TemplateRegistry`] is the
//! filesystem-backed implementation; [`MockTemplateEngine`] answers from
//! canned data.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use shotscan_template::{abstract_paths, Fields, Template, TemplateError, TemplateRegistry};

/// Template lookup, extraction, and search.
pub trait TemplateEngine {
    /// Handle returned by [`template`](Self::template).
    type Template;

    /// Looks up a template by name. Fails with [`TemplateError::NotFound`].
    fn template(&self, name: &str) -> Result<Self::Template, TemplateError>;

    /// Extracts fields from a path that matches `template` exactly. Fails
    /// with [`TemplateError::NoMatch`].
    fn extract_fields(
        &self,
        template: &Self::Template,
        path: &Path,
    ) -> Result<Fields, TemplateError>;

    /// Existing paths matching `template` with `fields` bound. Unbound keys
    /// are wildcards. The order of the result is up to the implementation.
    fn find_paths(
        &self,
        template: &Self::Template,
        fields: &Fields,
    ) -> Result<Vec<PathBuf>, TemplateError>;
}

impl TemplateEngine for TemplateRegistry {
    type Template = Template;

    fn template(&self, name: &str) -> Result<Template, TemplateError> {
        TemplateRegistry::template(self, name).cloned()
    }

    fn extract_fields(&self, template: &Template, path: &Path) -> Result<Fields, TemplateError> {
        template.extract_fields(path)
    }

    /// Frame sequences collapse to one abstract path (`shot010.%04d.exr`).
    fn find_paths(&self, template: &Template, fields: &Fields) -> Result<Vec<PathBuf>, TemplateError> {
        abstract_paths(template, fields)
    }
}

/// A [`TemplateEngine`] that answers from canned data and records searches.
///
/// ```
/// use std::path::Path;
/// use shotscan::{MockTemplateEngine, TemplateEngine};
/// use shotscan_template::{fields, FieldValue};
///
/// let engine = MockTemplateEngine::new()
///     .with_fields("work", "/w/shot010_v003.ma", fields([("version", FieldValue::Int(3))]))
///     .with_matches("render", fields([("name", "shot010")]), ["/r/shot010.exr"]);
///
/// let work = engine.template("work").unwrap();
/// let f = engine.extract_fields(&work, Path::new("/w/shot010_v003.ma")).unwrap();
/// assert_eq!(f["version"], FieldValue::Int(3));
///
/// let render = engine.template("render").unwrap();
/// let found = engine.find_paths(&render, &fields([("name", "shot010")])).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(engine.searches().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTemplateEngine {
    known: BTreeMap<String, BTreeMap<PathBuf, Fields>>,
    matches: Vec<(String, Fields, Vec<PathBuf>)>,
    failures: Vec<(String, Fields)>,
    searches: RefCell<Vec<(String, Fields)>>,
}

impl MockTemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template that matches no path.
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.known.entry(name.into()).or_default();
        self
    }

    /// Registers `path` as matching `template` with the given fields.
    pub fn with_fields(
        mut self,
        template: impl Into<String>,
        path: impl Into<PathBuf>,
        fields: Fields,
    ) -> Self {
        self.known
            .entry(template.into())
            .or_default()
            .insert(path.into(), fields);
        self
    }

    /// Answers a search on `template` with exactly `fields` with `paths`.
    pub fn with_matches<I, P>(mut self, template: impl Into<String>, fields: Fields, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let template = template.into();
        self.known.entry(template.clone()).or_default();
        self.matches
            .push((template, fields, paths.into_iter().map(Into::into).collect()));
        self
    }

    /// Makes a search on `template` with exactly `fields` fail.
    pub fn with_failure(mut self, template: impl Into<String>, fields: Fields) -> Self {
        let template = template.into();
        self.known.entry(template.clone()).or_default();
        self.failures.push((template, fields));
        self
    }

    /// Every search issued so far, in order.
    pub fn searches(&self) -> Vec<(String, Fields)> {
        self.searches.borrow().clone()
    }
}

impl TemplateEngine for MockTemplateEngine {
    type Template = String;

    fn template(&self, name: &str) -> Result<String, TemplateError> {
        if self.known.contains_key(name) {
            Ok(name.to_string())
        } else {
            Err(TemplateError::NotFound {
                name: name.to_string(),
            })
        }
    }

    fn extract_fields(&self, template: &String, path: &Path) -> Result<Fields, TemplateError> {
        self.known
            .get(template)
            .and_then(|paths| paths.get(path))
            .cloned()
            .ok_or_else(|| TemplateError::NoMatch {
                template: template.clone(),
                path: path.to_string_lossy().into_owned(),
            })
    }

    fn find_paths(&self, template: &String, fields: &Fields) -> Result<Vec<PathBuf>, TemplateError> {
        self.searches
            .borrow_mut()
            .push((template.clone(), fields.clone()));

        if self
            .failures
            .iter()
            .any(|(t, f)| t == template && f == fields)
        {
            return Err(TemplateError::Io {
                path: PathBuf::from(template),
                source: io::Error::other("search failed"),
            });
        }

        Ok(self
            .matches
            .iter()
            .find(|(t, f, _)| t == template && f == fields)
            .map(|(_, _, paths)| paths.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotscan_template::{fields, FieldValue};

    #[test]
    fn mock_unknown_template() {
        let engine = MockTemplateEngine::new();
        assert!(matches!(
            engine.template("x"),
            Err(TemplateError::NotFound { .. })
        ));
    }

    #[test]
    fn mock_unregistered_path_is_no_match() {
        let engine = MockTemplateEngine::new().with_template("work");
        let err = engine
            .extract_fields(&"work".to_string(), Path::new("/nope.ma"))
            .unwrap_err();
        assert!(matches!(err, TemplateError::NoMatch { .. }));
    }

    #[test]
    fn mock_search_miss_is_empty() {
        let engine = MockTemplateEngine::new().with_matches(
            "render",
            fields([("name", "a")]),
            ["/a.exr"],
        );
        let found = engine
            .find_paths(&"render".to_string(), &fields([("name", "b")]))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn mock_failure() {
        let engine = MockTemplateEngine::new()
            .with_failure("render", fields([("name", FieldValue::from("a"))]));
        assert!(engine
            .find_paths(&"render".to_string(), &fields([("name", "a")]))
            .is_err());
    }

    #[test]
    fn registry_engine_round_trip() {
        let registry = TemplateRegistry::from_yaml_str(
            r#"
keys:
  name: { type: str }
  version: { type: int }
paths:
  work: "/w/{name}_v{version}.ma"
"#,
        )
        .unwrap();

        let work = TemplateEngine::template(&registry, "work").unwrap();
        let f = TemplateEngine::extract_fields(&registry, &work, Path::new("/w/a_v3.ma")).unwrap();
        assert_eq!(f["version"], FieldValue::Int(3));
        assert!(matches!(
            TemplateEngine::template(&registry, "render"),
            Err(TemplateError::NotFound { .. })
        ));
    }
}
