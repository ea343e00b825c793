//! Template parsing, field extraction, and path building.
//!
//! A definition such as `{Shot}/work/{name}_v{version}.ma` is split into
//! literal runs and key slots. The whole-path regex built from those pieces is
//! used to pull fields out of a concrete path; the per-segment view in
//! [`Template::segments`] drives the filesystem search in [`crate::finder`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Result, TemplateError};
use crate::key::Key;
use crate::value::{FieldValue, Fields};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    /// Index into `Template::keys`.
    Key(usize),
}

/// One `/`-separated component of a template, resolved against a partial
/// field set.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// Every key in the component was bound; the text is exact.
    Literal(String),
    /// At least one key is unbound and acts as a wildcard.
    Pattern(Regex),
}

/// A path pattern with typed, named fields.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use shotscan_template::{fields, FieldValue, Key, Template};
///
/// let keys = BTreeMap::from([
///     ("name".to_string(), Key::string("name")),
///     ("version".to_string(), Key::int("version").with_padding(3)),
/// ]);
/// let work = Template::parse("work", "/proj/work/{name}_v{version}.ma", &keys, None).unwrap();
///
/// let f = work.extract_fields("/proj/work/shot010_v003.ma").unwrap();
/// assert_eq!(f["version"], FieldValue::Int(3));
///
/// let path = work.apply_fields(&fields([("name", FieldValue::from("shot020")), ("version", 12.into())])).unwrap();
/// assert_eq!(path.to_str(), Some("/proj/work/shot020_v012.ma"));
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    definition: String,
    keys: Vec<Key>,
    tokens: Vec<Token>,
    regex: Regex,
}

impl Template {
    /// Parses `definition`, resolving `{key}` slots against `keys`.
    ///
    /// When `root` is given the definition is taken relative to it.
    pub fn parse(
        name: &str,
        definition: &str,
        keys: &BTreeMap<String, Key>,
        root: Option<&Path>,
    ) -> Result<Self> {
        let definition = match root {
            Some(root) => join_root(root, definition),
            None => definition.replace('\\', "/"),
        };

        let syntax = |message: &str| TemplateError::Syntax {
            template: name.to_string(),
            message: message.to_string(),
        };

        let mut tokens = Vec::new();
        let mut used: Vec<Key> = Vec::new();
        let mut rest = definition.as_str();

        while let Some(open) = rest.find('{') {
            if open > 0 {
                tokens.push(Token::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| syntax("unterminated '{'"))?;
            let key_name = after[..close].trim();
            if key_name.is_empty() {
                return Err(syntax("empty key name"));
            }
            if key_name.contains('{') {
                return Err(syntax("nested '{'"));
            }
            let key = keys.get(key_name).ok_or_else(|| TemplateError::UnknownKey {
                template: name.to_string(),
                key: key_name.to_string(),
            })?;

            let index = match used.iter().position(|k| k.name() == key_name) {
                Some(i) => i,
                None => {
                    used.push(key.clone());
                    used.len() - 1
                }
            };
            tokens.push(Token::Key(index));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            tokens.push(Token::Literal(rest.to_string()));
        }

        let mut pattern = String::from("^");
        for token in &tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::Key(i) => {
                    pattern.push('(');
                    pattern.push_str(&used[*i].pattern());
                    pattern.push(')');
                }
            }
        }
        pattern.push('$');

        Ok(Template {
            name: name.to_string(),
            definition,
            keys: used,
            tokens,
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition with the root applied, using `/` separators.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Distinct keys in order of first appearance.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.name() == name)
    }

    /// Returns `true` if `path` matches this template exactly.
    pub fn validate(&self, path: impl AsRef<Path>) -> bool {
        self.extract_fields(path).is_ok()
    }

    /// Pulls every field out of a path that matches this template exactly.
    ///
    /// A key that appears more than once must carry the same value at each
    /// occurrence.
    pub fn extract_fields(&self, path: impl AsRef<Path>) -> Result<Fields> {
        let input = normalize(path.as_ref());
        let no_match = || TemplateError::NoMatch {
            template: self.name.clone(),
            path: input.clone(),
        };

        let caps = self.regex.captures(&input).ok_or_else(no_match)?;
        let mut fields = Fields::new();
        let slots = self.tokens.iter().filter_map(|t| match t {
            Token::Key(i) => Some(*i),
            Token::Literal(_) => None,
        });

        for (group, index) in slots.enumerate() {
            let raw = caps.get(group + 1).ok_or_else(no_match)?.as_str();
            let key = &self.keys[index];
            let value = key.parse(raw).map_err(|_| no_match())?;
            match fields.get(key.name()) {
                Some(existing) if *existing != value => return Err(no_match()),
                Some(_) => {}
                None => {
                    fields.insert(key.name().to_string(), value);
                }
            }
        }
        Ok(fields)
    }

    /// Builds a concrete path. Keys missing from `fields` fall back to their
    /// declared default.
    pub fn apply_fields(&self, fields: &Fields) -> Result<PathBuf> {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Key(i) => {
                    let key = &self.keys[*i];
                    let value = self.value_for(key, fields)?;
                    out.push_str(&key.format(value)?);
                }
            }
        }
        Ok(PathBuf::from(out))
    }

    /// Returns `true` if every key in `fields` that this template uses formats
    /// to the same text as in `found`.
    pub(crate) fn agrees_with(&self, bound: &Fields, found: &Fields) -> bool {
        self.keys.iter().all(|key| match (bound.get(key.name()), found.get(key.name())) {
            (Some(want), Some(got)) => match (key.format(want), key.format(got)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
            _ => true,
        })
    }

    /// Splits the template into path components with `fields` substituted.
    pub(crate) fn segments(&self, fields: &Fields) -> Result<Vec<Segment>> {
        enum Piece<'a> {
            Text(&'a str),
            Slot(usize),
        }

        let mut components: Vec<Vec<Piece<'_>>> = vec![Vec::new()];
        for token in &self.tokens {
            match token {
                Token::Literal(text) => {
                    let mut parts = text.split('/');
                    if let Some(first) = parts.next() {
                        if let Some(current) = components.last_mut() {
                            current.push(Piece::Text(first));
                        }
                    }
                    for part in parts {
                        components.push(vec![Piece::Text(part)]);
                    }
                }
                Token::Key(i) => {
                    if let Some(current) = components.last_mut() {
                        current.push(Piece::Slot(*i));
                    }
                }
            }
        }

        let mut segments = Vec::with_capacity(components.len());
        for pieces in components {
            let mut exact = String::new();
            let mut pattern = String::from("^");
            let mut wildcard = false;

            for piece in pieces {
                match piece {
                    Piece::Text(text) => {
                        exact.push_str(text);
                        pattern.push_str(&regex::escape(text));
                    }
                    Piece::Slot(i) => {
                        let key = &self.keys[i];
                        match fields.get(key.name()) {
                            Some(value) => {
                                let text = key.format(value)?;
                                pattern.push_str(&regex::escape(&text));
                                exact.push_str(&text);
                            }
                            None => {
                                wildcard = true;
                                pattern.push_str("(?:");
                                pattern.push_str(&key.pattern());
                                pattern.push(')');
                            }
                        }
                    }
                }
            }

            if wildcard {
                pattern.push('$');
                segments.push(Segment::Pattern(Regex::new(&pattern)?));
            } else {
                segments.push(Segment::Literal(exact));
            }
        }
        Ok(segments)
    }

    fn value_for<'a>(&self, key: &'a Key, fields: &'a Fields) -> Result<&'a FieldValue> {
        fields
            .get(key.name())
            .or_else(|| key.default_value())
            .ok_or_else(|| TemplateError::MissingField {
                template: self.name.clone(),
                key: key.name().to_string(),
            })
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn join_root(root: &Path, definition: &str) -> String {
    let root = normalize(root);
    let definition = definition.replace('\\', "/");
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        definition.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{FilterBy, KeyKind};
    use crate::value::fields;

    fn keys() -> BTreeMap<String, Key> {
        [
            Key::string("Shot"),
            Key::string("name").with_filter(FilterBy::Alphanumeric),
            Key::int("version").with_padding(3),
            Key::sequence("SEQ").with_padding(4),
            Key::string("maya.layer_name"),
            Key::string("maya_extension")
                .with_choices(["ma", "mb"])
                .with_default("ma"),
        ]
        .into_iter()
        .map(|k| (k.name().to_string(), k))
        .collect()
    }

    fn work() -> Template {
        Template::parse(
            "maya_shot_work",
            "{Shot}/work/maya/{name}_v{version}.{maya_extension}",
            &keys(),
            Some(Path::new("/proj")),
        )
        .unwrap()
    }

    #[test]
    fn root_is_joined() {
        assert_eq!(
            work().definition(),
            "/proj/{Shot}/work/maya/{name}_v{version}.{maya_extension}"
        );
        let t = Template::parse("t", "/a/{Shot}", &keys(), Some(Path::new("/"))).unwrap();
        assert_eq!(t.definition(), "/a/{Shot}");
    }

    #[test]
    fn extracts_work_fields() {
        let f = work()
            .extract_fields("/proj/shot010/work/maya/shot010_v003.ma")
            .unwrap();
        assert_eq!(f["Shot"], FieldValue::from("shot010"));
        assert_eq!(f["name"], FieldValue::from("shot010"));
        assert_eq!(f["version"], FieldValue::Int(3));
        assert_eq!(f["maya_extension"], FieldValue::from("ma"));
    }

    #[test]
    fn extract_rejects_non_conforming_paths() {
        let t = work();
        assert!(matches!(
            t.extract_fields("/proj/shot010/work/maya/shot010.ma"),
            Err(TemplateError::NoMatch { .. })
        ));
        assert!(!t.validate("/proj/shot010/work/maya/shot010_v003.obj"));
        assert!(!t.validate("/other/shot010/work/maya/shot010_v003.ma"));
    }

    #[test]
    fn repeated_keys_must_agree() {
        let t = Template::parse("t", "/p/{Shot}/{Shot}.ma", &keys(), None).unwrap();
        assert_eq!(t.keys().len(), 1);
        assert!(t.validate("/p/s1/s1.ma"));
        assert!(!t.validate("/p/s1/s2.ma"));
    }

    #[test]
    fn apply_uses_defaults_and_padding() {
        let path = work()
            .apply_fields(&fields([
                ("Shot", FieldValue::from("shot020")),
                ("name", "shot020".into()),
                ("version", 7.into()),
            ]))
            .unwrap();
        assert_eq!(path, PathBuf::from("/proj/shot020/work/maya/shot020_v007.ma"));
    }

    #[test]
    fn apply_reports_missing_field() {
        let err = work()
            .apply_fields(&fields([("Shot", "shot020")]))
            .unwrap_err();
        match err {
            TemplateError::MissingField { template, key } => {
                assert_eq!(template, "maya_shot_work");
                assert_eq!(key, "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dotted_key_names_are_supported() {
        let t = Template::parse(
            "render",
            "/r/{maya.layer_name}/{name}.{SEQ}.exr",
            &keys(),
            None,
        )
        .unwrap();
        let f = t.extract_fields("/r/masterLayer/shot010.0001.exr").unwrap();
        assert_eq!(f["maya.layer_name"], FieldValue::from("masterLayer"));
        assert_eq!(f["SEQ"], FieldValue::Int(1));
        assert_eq!(t.key("SEQ").map(Key::kind), Some(KeyKind::Sequence));
    }

    #[test]
    fn parse_errors() {
        let k = keys();
        assert!(matches!(
            Template::parse("t", "/a/{Shot", &k, None),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            Template::parse("t", "/a/{}", &k, None),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            Template::parse("t", "/a/{Nope}", &k, None),
            Err(TemplateError::UnknownKey { .. })
        ));
    }

    #[test]
    fn segments_bind_known_fields() {
        let t = Template::parse(
            "render",
            "/r/{maya.layer_name}/{name}.{SEQ}.exr",
            &keys(),
            None,
        )
        .unwrap();
        let segs = t
            .segments(&fields([("maya.layer_name", "fx"), ("name", "shot010")]))
            .unwrap();
        assert_eq!(segs.len(), 4);
        assert!(matches!(&segs[0], Segment::Literal(s) if s.is_empty()));
        assert!(matches!(&segs[1], Segment::Literal(s) if s == "r"));
        assert!(matches!(&segs[2], Segment::Literal(s) if s == "fx"));
        match &segs[3] {
            Segment::Pattern(re) => {
                assert!(re.is_match("shot010.0001.exr"));
                assert!(!re.is_match("shot020.0001.exr"));
            }
            Segment::Literal(s) => panic!("expected a pattern, got {s}"),
        }
    }

    #[test]
    fn backslashes_are_normalized() {
        let f = work()
            .extract_fields(r"\proj\shot010\work\maya\shot010_v003.mb")
            .unwrap();
        assert_eq!(f["maya_extension"], FieldValue::from("mb"));
    }
}
