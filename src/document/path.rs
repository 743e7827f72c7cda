//! Path expressions over canonical documents.
//!
//! A path is a `/`-delimited list of segments evaluated left to right. Each segment is
//! interpreted against the shape of the node it is applied to:
//!
//! - on a **mapping**, the segment is a literal key;
//! - on a **sequence**, the segment is either a non-negative index (`0`, `3`) or a
//!   predicate `field=value` selecting the first element whose `field` equals `value`;
//! - on a **scalar**, every segment fails.
//!
//! Segments use JSON-pointer escapes: `~1` stands for `/` and `~0` for `~`. The empty
//! path addresses the whole document.
//!
//! ```text
//! /instance_groups/name=redis_leader/jobs/name=redis/properties/redis/password
//! /redis_leader/0
//! ```
//!
//! There are no defaults: a missing key, an index past the end or a predicate with no
//! match is a [`PathError::NotFound`].

use thiserror::Error;

use super::Document;

/// Failure to address a value inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The expression is not a valid path.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending expression
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// A segment did not match the node it was applied to.
    #[error("path segment '{segment}' not found after '{consumed}'")]
    NotFound {
        /// The segment that failed, as written in the expression
        segment: String,
        /// The prefix that resolved successfully
        consumed: String,
    },
}

/// Look up the node addressed by `path`.
///
/// # Errors
///
/// Returns [`PathError::InvalidPath`] for expressions that do not start with `/`, and
/// [`PathError::NotFound`] naming the first segment that failed to resolve.
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Result<&'a Document, PathError> {
    if path.is_empty() {
        return Ok(doc);
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PathError::InvalidPath {
            path: path.to_string(),
            reason: "expected a leading '/'".to_string(),
        });
    };

    let mut current = doc;
    let mut consumed = String::new();
    for raw in rest.split('/') {
        let segment = unescape(raw);
        current = step(current, &segment).ok_or_else(|| PathError::NotFound {
            segment: raw.to_string(),
            consumed: if consumed.is_empty() {
                "/".to_string()
            } else {
                consumed.clone()
            },
        })?;
        consumed.push('/');
        consumed.push_str(raw);
    }
    Ok(current)
}

/// Resolve `path` and render the addressed value as text.
///
/// Strings are returned verbatim; numbers, booleans and null use their JSON text;
/// sequences and mappings are rendered as compact JSON.
///
/// # Errors
///
/// Same as [`lookup`].
pub fn resolve(doc: &Document, path: &str) -> Result<String, PathError> {
    lookup(doc, path).map(scalar_text)
}

fn step<'a>(node: &'a Document, segment: &str) -> Option<&'a Document> {
    match node {
        Document::Object(map) => map.get(segment),
        Document::Array(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                return items.get(index);
            }
            let (field, expected) = segment.split_once('=')?;
            items.iter().find(|item| {
                item.as_object()
                    .and_then(|map| map.get(field))
                    .is_some_and(|value| scalar_text(value) == expected)
            })
        }
        _ => None,
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

pub(crate) fn scalar_text(value: &Document) -> String {
    match value {
        Document::String(s) => s.clone(),
        other => other.to_string(),
    }
}
