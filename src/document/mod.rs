//! Tree-shaped documents and the two representations the adapter works with.
//!
//! Every structured value flowing through a render is a [`Document`]. Two flavors
//! exist:
//!
//! - **Native** ([`NativeDocument`]): what a YAML decoder produces. Mapping keys may be
//!   any scalar (numbers, booleans, null) and values may carry YAML tags.
//! - **Canonical** ([`Document`]): JSON semantics. Mapping keys are always strings and
//!   maps keep their insertion order.
//!
//! [`normalize`] is the single conversion boundary from native to canonical form and
//! [`to_native`] goes the other way. [`resolve`] and [`lookup`] address values inside a
//! canonical document with `/`-delimited path expressions.
//!
//! # Examples
//!
//! ```rust
//! use template_service_adapter::document::{normalize, resolve};
//!
//! let native: serde_yaml::Value = serde_yaml::from_str("a:\n- name: x\n  v: 1\n- name: y\n  v: 2\n")?;
//! let doc = normalize(native)?;
//! assert_eq!(resolve(&doc, "/a/name=y/v")?, "2");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod normalize;
pub mod path;

pub use normalize::{ConversionError, normalize, to_native};
pub use path::{PathError, lookup, resolve};

/// Canonical document: string keys only, JSON-compatible.
pub type Document = serde_json::Value;

/// Native document as produced by the YAML decoder.
pub type NativeDocument = serde_yaml::Value;
