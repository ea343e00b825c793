//! Searching the filesystem for paths that fit a template.
//!
//! The search walks one path component at a time. Components whose keys are
//! all bound are joined directly; the rest are matched against each directory
//! entry, visited in lexicographic order. Every candidate is re-checked with
//! [`Template::extract_fields`] so that keys repeated across components stay
//! consistent.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{Result, TemplateError};
use crate::template::{Segment, Template};
use crate::value::Fields;

/// Finds existing paths matching `template` with `fields` bound.
///
/// Keys missing from `fields` match any value. A directory that does not
/// exist simply yields nothing.
pub fn find_paths(template: &Template, fields: &Fields) -> Result<Vec<PathBuf>> {
    let segments = template.segments(fields)?;

    let mut candidates = Vec::new();
    match segments.split_first() {
        // Absolute definitions start with an empty component.
        Some((Segment::Literal(first), rest)) if first.is_empty() => {
            walk(Path::new("/"), rest, &mut candidates)?
        }
        _ => walk(Path::new(""), &segments, &mut candidates)?,
    }

    let found: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| match template.extract_fields(path) {
            Ok(extracted) => template.agrees_with(fields, &extracted),
            Err(_) => false,
        })
        .collect();

    debug!(
        "template '{}' matched {} path(s) on disk",
        template.name(),
        found.len()
    );
    Ok(found)
}

/// Like [`find_paths`], but every `sequence` key is collapsed to its abstract
/// token (`%04d`), so a rendered frame range shows up as one path.
///
/// Duplicates are dropped; the first-seen order is kept.
pub fn abstract_paths(template: &Template, fields: &Fields) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for path in find_paths(template, fields)? {
        let mut extracted = template.extract_fields(&path)?;
        for key in template.keys() {
            if let Some(token) = key.abstract_value() {
                extracted.insert(key.name().to_string(), token);
            }
        }
        let abstracted = template.apply_fields(&extracted)?;
        if seen.insert(abstracted.clone()) {
            out.push(abstracted);
        }
    }
    Ok(out)
}

fn walk(base: &Path, segments: &[Segment], out: &mut Vec<PathBuf>) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(());
    };
    let last = rest.is_empty();

    match segment {
        Segment::Literal(name) => {
            let next = base.join(name);
            if last {
                if next.exists() {
                    out.push(next);
                }
            } else if next.is_dir() {
                walk(&next, rest, out)?;
            }
        }
        Segment::Pattern(re) => {
            for name in list_dir(base)? {
                if !re.is_match(&name) {
                    continue;
                }
                let next = base.join(&name);
                if last {
                    out.push(next);
                } else if next.is_dir() {
                    walk(&next, rest, out)?;
                }
            }
        }
    }
    Ok(())
}

/// Entry names of `dir`, sorted. Missing directories read as empty.
fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let read_from = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    trace!("listing {}", read_from.display());

    let entries = match std::fs::read_dir(read_from) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(TemplateError::io(read_from, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TemplateError::io(read_from, e))?;
        // Non UTF-8 names can never match a template.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{FilterBy, Key};
    use crate::value::{fields, FieldValue};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn keys() -> BTreeMap<String, Key> {
        [
            Key::string("Shot"),
            Key::string("name").with_filter(FilterBy::Alphanumeric),
            Key::sequence("SEQ").with_padding(4),
            Key::string("maya.layer_name"),
        ]
        .into_iter()
        .map(|k| (k.name().to_string(), k))
        .collect()
    }

    fn render(root: &Path) -> Template {
        Template::parse(
            "maya_shot_render",
            "{Shot}/render/{maya.layer_name}/{name}.{SEQ}.exr",
            &keys(),
            Some(root),
        )
        .unwrap()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn finds_frames_with_partial_fields() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "shot010/render/masterLayer/shot010.0002.exr");
        touch(tmp.path(), "shot010/render/masterLayer/shot010.0001.exr");
        touch(tmp.path(), "shot010/render/fx/shot010.0001.exr");
        touch(tmp.path(), "shot010/render/masterLayer/notes.txt");

        let t = render(tmp.path());
        let found = find_paths(
            &t,
            &fields([("name", "shot010"), ("maya.layer_name", "masterLayer")]),
        )
        .unwrap();

        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["shot010.0001.exr", "shot010.0002.exr"]);
    }

    #[test]
    fn abstract_paths_collapse_sequences() {
        let tmp = TempDir::new().unwrap();
        for frame in 1..=3 {
            touch(
                tmp.path(),
                &format!("shot010/render/masterLayer/shot010.{frame:04}.exr"),
            );
        }

        let t = render(tmp.path());
        let found = abstract_paths(
            &t,
            &fields([("name", "shot010"), ("maya.layer_name", "masterLayer")]),
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("shot010/render/masterLayer/shot010.%04d.exr"));
    }

    #[test]
    fn missing_directories_yield_nothing() {
        let tmp = TempDir::new().unwrap();
        let t = render(&tmp.path().join("does-not-exist"));
        let found = find_paths(&t, &fields([("maya.layer_name", "fx")])).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn bound_values_filter_results() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "shot010/render/fx/shot010.0001.exr");
        touch(tmp.path(), "shot010/render/fx/shot020.0001.exr");

        let t = render(tmp.path());
        let found = find_paths(&t, &fields([("name", FieldValue::from("shot020"))])).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("shot020.0001.exr"));
    }
}
