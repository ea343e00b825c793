//! Typed template keys.
//!
//! A [`Key`] describes one `{field}` slot: which strings it accepts when a
//! path is parsed, and how a [`FieldValue`] is written back when a path is
//! built.
//!
//! | Type | Accepts | Writes |
//! |------|---------|--------|
//! | `str` | any run of non-`/` characters, or the declared `choices` / `filter_by` set | the string |
//! | `int` | digits | the integer, zero-padded per `format_spec` |
//! | `sequence` | digits, `%04d`, `####`, `@@@@` | a frame number or abstract token |

use serde::Deserialize;

use crate::error::{Result, TemplateError};
use crate::value::FieldValue;

/// The value type of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Str,
    Int,
    Sequence,
}

/// Character class restriction for `str` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBy {
    /// `[A-Za-z0-9]+`
    Alphanumeric,
    /// `[A-Za-z]+`
    Alpha,
}

/// A key as declared in configuration, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySpec {
    #[serde(rename = "type")]
    pub kind: KeyKind,
    #[serde(default)]
    pub format_spec: Option<String>,
    #[serde(default)]
    pub filter_by: Option<FilterBy>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub default: Option<FieldValue>,
}

/// A validated template key.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    name: String,
    kind: KeyKind,
    pad: Option<usize>,
    filter_by: Option<FilterBy>,
    choices: Vec<String>,
    default: Option<FieldValue>,
}

impl Key {
    /// Creates an unrestricted key of the given kind.
    pub fn new(name: impl Into<String>, kind: KeyKind) -> Self {
        Key {
            name: name.into(),
            kind,
            pad: None,
            filter_by: None,
            choices: Vec::new(),
            default: None,
        }
    }

    /// Shorthand for a `str` key.
    pub fn string(name: impl Into<String>) -> Self {
        Key::new(name, KeyKind::Str)
    }

    /// Shorthand for an `int` key.
    pub fn int(name: impl Into<String>) -> Self {
        Key::new(name, KeyKind::Int)
    }

    /// Shorthand for a `sequence` key.
    pub fn sequence(name: impl Into<String>) -> Self {
        Key::new(name, KeyKind::Sequence)
    }

    /// Validates a configuration entry.
    pub fn from_spec(name: &str, spec: &KeySpec) -> Result<Self> {
        let pad = match &spec.format_spec {
            Some(fs) => Some(parse_format_spec(name, fs)?),
            None => None,
        };
        let key = Key {
            name: name.to_string(),
            kind: spec.kind,
            pad,
            filter_by: spec.filter_by,
            choices: spec.choices.clone(),
            default: None,
        };
        // Defaults must survive a round through `format`.
        match &spec.default {
            Some(default) => {
                key.format(default)?;
                Ok(key.with_default(default.clone()))
            }
            None => Ok(key),
        }
    }

    /// Zero-pads integer output to `width` digits.
    pub fn with_padding(mut self, width: usize) -> Self {
        self.pad = Some(width);
        self
    }

    pub fn with_filter(mut self, filter: FilterBy) -> Self {
        self.filter_by = Some(filter);
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    /// Regex fragment (no capture group) matching one value of this key.
    pub fn pattern(&self) -> String {
        match self.kind {
            KeyKind::Str if !self.choices.is_empty() => {
                let alts: Vec<String> = self.choices.iter().map(|c| regex::escape(c)).collect();
                format!("(?:{})", alts.join("|"))
            }
            KeyKind::Str => match self.filter_by {
                Some(FilterBy::Alphanumeric) => "[A-Za-z0-9]+".to_string(),
                Some(FilterBy::Alpha) => "[A-Za-z]+".to_string(),
                None => "[^/]+?".to_string(),
            },
            KeyKind::Int => match self.pad {
                Some(width) => format!(r"\d{{{width},}}"),
                None => r"\d+".to_string(),
            },
            KeyKind::Sequence => r"(?:\d+|%0?\d*d|#+|@+)".to_string(),
        }
    }

    /// Converts a matched substring into a typed value.
    pub fn parse(&self, raw: &str) -> Result<FieldValue> {
        match self.kind {
            KeyKind::Str => Ok(FieldValue::Str(raw.to_string())),
            KeyKind::Int => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| TemplateError::invalid_value(&self.name, raw)),
            KeyKind::Sequence => match raw.parse::<i64>() {
                Ok(frame) => Ok(FieldValue::Int(frame)),
                Err(_) => Ok(FieldValue::Str(raw.to_string())),
            },
        }
    }

    /// Writes a value the way it appears in a path.
    pub fn format(&self, value: &FieldValue) -> Result<String> {
        match (self.kind, value) {
            (KeyKind::Str, v) => {
                let s = v.to_string();
                if !self.choices.is_empty() && !self.choices.contains(&s) {
                    return Err(TemplateError::invalid_value(&self.name, s));
                }
                Ok(s)
            }
            (KeyKind::Int | KeyKind::Sequence, FieldValue::Int(n)) => Ok(self.pad_int(*n)),
            (KeyKind::Int, FieldValue::Str(s)) => s
                .parse::<i64>()
                .map(|n| self.pad_int(n))
                .map_err(|_| TemplateError::invalid_value(&self.name, s)),
            // Abstract frame tokens pass through untouched.
            (KeyKind::Sequence, FieldValue::Str(s)) => Ok(s.clone()),
        }
    }

    /// The printf-style token standing in for every frame of a sequence.
    ///
    /// Returns `None` for keys that are not sequences.
    pub fn abstract_value(&self) -> Option<FieldValue> {
        match (self.kind, self.pad) {
            (KeyKind::Sequence, Some(width)) => Some(FieldValue::Str(format!("%0{width}d"))),
            (KeyKind::Sequence, None) => Some(FieldValue::Str("%d".to_string())),
            _ => None,
        }
    }

    fn pad_int(&self, n: i64) -> String {
        match self.pad {
            Some(width) => format!("{n:0width$}"),
            None => n.to_string(),
        }
    }
}

/// Accepts `"0N"`: zero padding to width N.
fn parse_format_spec(key: &str, spec: &str) -> Result<usize> {
    let invalid = || TemplateError::InvalidFormatSpec {
        key: key.to_string(),
        spec: spec.to_string(),
    };
    let width = spec.strip_prefix('0').ok_or_else(invalid)?;
    match width.parse::<usize>() {
        Ok(w) if w > 0 => Ok(w),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> KeySpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn int_padding_from_spec() {
        let key = Key::from_spec("version", &spec("{type: int, format_spec: '03'}")).unwrap();
        assert_eq!(key.format(&FieldValue::Int(3)).unwrap(), "003");
        assert_eq!(key.format(&FieldValue::Int(1234)).unwrap(), "1234");
        assert_eq!(key.parse("003").unwrap(), FieldValue::Int(3));
    }

    #[test]
    fn rejects_unknown_format_spec() {
        let err = Key::from_spec("version", &spec("{type: int, format_spec: '3'}")).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidFormatSpec { .. }));

        let err = Key::from_spec("version", &spec("{type: int, format_spec: '00'}")).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidFormatSpec { .. }));
    }

    #[test]
    fn choices_restrict_format() {
        let key = Key::string("ext").with_choices(["ma", "mb"]);
        assert_eq!(key.format(&"ma".into()).unwrap(), "ma");
        assert!(matches!(
            key.format(&"obj".into()),
            Err(TemplateError::InvalidValue { .. })
        ));
    }

    #[test]
    fn default_must_be_formattable() {
        let err = Key::from_spec(
            "ext",
            &spec("{type: str, choices: [ma, mb], default: obj}"),
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidValue { .. }));

        let key = Key::from_spec("ext", &spec("{type: str, choices: [ma, mb], default: ma}"))
            .unwrap();
        assert_eq!(key.default_value(), Some(&FieldValue::from("ma")));
    }

    #[test]
    fn sequence_parses_frames_and_tokens() {
        let key = Key::sequence("SEQ").with_padding(4);
        assert_eq!(key.parse("0001").unwrap(), FieldValue::Int(1));
        assert_eq!(key.parse("%04d").unwrap(), FieldValue::from("%04d"));
        assert_eq!(key.parse("####").unwrap(), FieldValue::from("####"));
        assert_eq!(key.format(&FieldValue::Int(12)).unwrap(), "0012");
        assert_eq!(key.abstract_value(), Some(FieldValue::from("%04d")));
        assert_eq!(Key::sequence("SEQ").abstract_value(), Some("%d".into()));
    }

    #[test]
    fn int_rejects_non_numeric_string() {
        let key = Key::int("version");
        assert!(key.format(&"abc".into()).is_err());
        assert_eq!(key.format(&"7".into()).unwrap(), "7");
        assert!(key.abstract_value().is_none());
    }

    #[test]
    fn patterns_follow_filters() {
        let re = regex::Regex::new(&format!(
            "^{}$",
            Key::string("name").with_filter(FilterBy::Alphanumeric).pattern()
        ))
        .unwrap();
        assert!(re.is_match("shot010"));
        assert!(!re.is_match("shot_010"));

        let re = regex::Regex::new(&format!("^{}$", Key::string("any").pattern())).unwrap();
        assert!(re.is_match("shot_010"));
        assert!(!re.is_match("a/b"));
    }
}
