//! Conversion between native (YAML) and canonical (JSON) documents.
//!
//! Normalization walks the native tree once. Scalars pass through, sequences are
//! converted element-wise and mappings key-by-key. Scalar keys that are not strings
//! are rewritten to their natural text (`1` -> `"1"`, `true` -> `"true"`,
//! `~` -> `"null"`). When two keys collapse onto the same string, the later entry wins
//! and keeps the position of the first one.
//!
//! YAML tags carry no meaning in canonical form, so a tagged value is replaced by its
//! normalized inner value.

use serde_json::{Map, Number};
use serde_yaml::value::TaggedValue;
use thiserror::Error;

use super::{Document, NativeDocument};

/// A native value that has no canonical representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A mapping key is itself a mapping or a sequence.
    #[error("mapping key at '{path}' is a {kind} and cannot be converted to a string")]
    UnsupportedKey {
        /// Location of the mapping holding the key
        path: String,
        /// Shape of the offending key
        kind: &'static str,
    },

    /// A floating point value is NaN or infinite, which JSON cannot express.
    #[error("value at '{path}' is a non-finite number ({value})")]
    NonFiniteNumber {
        /// Location of the value
        path: String,
        /// Textual form of the number
        value: String,
    },
}

/// Convert a native document into canonical form.
///
/// # Errors
///
/// Returns [`ConversionError`] if a mapping key is a mapping or sequence, or if a
/// number cannot be represented in JSON.
pub fn normalize(native: NativeDocument) -> Result<Document, ConversionError> {
    normalize_at(native, &mut String::new())
}

fn normalize_at(native: NativeDocument, path: &mut String) -> Result<Document, ConversionError> {
    match native {
        NativeDocument::Null => Ok(Document::Null),
        NativeDocument::Bool(b) => Ok(Document::Bool(b)),
        NativeDocument::Number(n) => convert_number(&n, path).map(Document::Number),
        NativeDocument::String(s) => Ok(Document::String(s)),
        NativeDocument::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let mark = path.len();
                path.push('/');
                path.push_str(&index.to_string());
                out.push(normalize_at(item, path)?);
                path.truncate(mark);
            }
            Ok(Document::Array(out))
        }
        NativeDocument::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = key_to_string(key, path)?;
                let mark = path.len();
                path.push('/');
                path.push_str(&key);
                let value = normalize_at(value, path)?;
                path.truncate(mark);
                out.insert(key, value);
            }
            Ok(Document::Object(out))
        }
        NativeDocument::Tagged(tagged) => {
            let TaggedValue {
                tag,
                value,
            } = *tagged;
            tracing::trace!("Dropping YAML tag {} at '{}'", tag, display_path(path));
            normalize_at(value, path)
        }
    }
}

fn key_to_string(key: NativeDocument, path: &str) -> Result<String, ConversionError> {
    match key {
        NativeDocument::String(s) => Ok(s),
        NativeDocument::Bool(b) => Ok(b.to_string()),
        NativeDocument::Number(n) => Ok(n.to_string()),
        NativeDocument::Null => Ok("null".to_string()),
        NativeDocument::Tagged(tagged) => key_to_string(tagged.value, path),
        NativeDocument::Sequence(_) => Err(ConversionError::UnsupportedKey {
            path: display_path(path),
            kind: "sequence",
        }),
        NativeDocument::Mapping(_) => Err(ConversionError::UnsupportedKey {
            path: display_path(path),
            kind: "mapping",
        }),
    }
}

fn convert_number(n: &serde_yaml::Number, path: &str) -> Result<Number, ConversionError> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    n.as_f64().and_then(Number::from_f64).ok_or_else(|| ConversionError::NonFiniteNumber {
        path: display_path(path),
        value: n.to_string(),
    })
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Convert a canonical document back into a native one.
///
/// Every canonical document has a native counterpart, so this never fails.
pub fn to_native(doc: &Document) -> NativeDocument {
    match doc {
        Document::Null => NativeDocument::Null,
        Document::Bool(b) => NativeDocument::Bool(*b),
        Document::Number(n) => {
            let number = if let Some(i) = n.as_i64() {
                serde_yaml::Number::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Number::from(u)
            } else {
                serde_yaml::Number::from(n.as_f64().unwrap_or_default())
            };
            NativeDocument::Number(number)
        }
        Document::String(s) => NativeDocument::String(s.clone()),
        Document::Array(items) => NativeDocument::Sequence(items.iter().map(to_native).collect()),
        Document::Object(map) => {
            let mut mapping = serde_yaml::Mapping::with_capacity(map.len());
            for (key, value) in map {
                mapping.insert(NativeDocument::String(key.clone()), to_native(value));
            }
            NativeDocument::Mapping(mapping)
        }
    }
}
