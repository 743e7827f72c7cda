//! The render context: named values visible to templates and hooks.
//!
//! A [`RenderContext`] is a typed table of slots. Templates see each slot as a top-level
//! variable (`{{ deployment.deployment_name }}`) and hooks receive the whole table as one
//! JSON object keyed by the slot names below.
//!
//! | Slot | Key | Written by |
//! |------|-----|-----------|
//! | [`ContextKey::Params`] | `params` | both renders |
//! | [`ContextKey::Deployment`] | `deployment` | both renders |
//! | [`ContextKey::Plan`] | `plan` | manifest render |
//! | [`ContextKey::PreviousPlan`] | `previousPlan` | manifest render |
//! | [`ContextKey::PreviousManifest`] | `previousManifest` | manifest render |
//! | [`ContextKey::BindingId`] | `bindingId` | binding render |
//! | [`ContextKey::GeneratedParams`] | `generatedParams` | pre-hook result |
//! | [`ContextKey::Manifest`] | `manifest` | manifest output / binding input |
//! | [`ContextKey::Binding`] | `binding` | binding output |
//!
//! Input slots are write-once. Only the slots a pipeline fills in as it progresses
//! (`generatedParams`, `manifest`, `binding`) may be overwritten.

use std::fmt;

use serde::Serialize;
use serde_json::Map;

use crate::core::AdapterError;
use crate::document::Document;

/// A named slot in the render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Deployment,
    Plan,
    PreviousPlan,
    PreviousManifest,
    Params,
    BindingId,
    Manifest,
    Binding,
    GeneratedParams,
}

impl ContextKey {
    /// Name of the slot as seen by templates and hook scripts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Plan => "plan",
            Self::PreviousPlan => "previousPlan",
            Self::PreviousManifest => "previousManifest",
            Self::Params => "params",
            Self::BindingId => "bindingId",
            Self::Manifest => "manifest",
            Self::Binding => "binding",
            Self::GeneratedParams => "generatedParams",
        }
    }

    /// Whether a pipeline stage may replace an existing value in this slot.
    #[must_use]
    pub const fn is_rewritable(self) -> bool {
        matches!(self, Self::GeneratedParams | Self::Manifest | Self::Binding)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values visible to a template and passed to its hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    slots: Map<String, Document>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::ContextSlotOccupied`] if `key` is write-once and already set
    /// - [`AdapterError::ContextSerialization`] if `value` cannot be represented as JSON
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: ContextKey,
        value: &T,
    ) -> Result<(), AdapterError> {
        if !key.is_rewritable() && self.slots.contains_key(key.as_str()) {
            return Err(AdapterError::ContextSlotOccupied {
                key: key.as_str().to_string(),
            });
        }
        let value =
            serde_json::to_value(value).map_err(|source| AdapterError::ContextSerialization {
                key: key.as_str().to_string(),
                source,
            })?;
        self.slots.insert(key.as_str().to_string(), value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: ContextKey) -> Option<&Document> {
        self.slots.get(key.as_str())
    }

    /// The whole context as one JSON object, in insertion order.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document::Object(self.slots.clone())
    }

    /// The context as Tera template variables.
    #[must_use]
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.slots {
            context.insert(key.as_str(), value);
        }
        context
    }
}
