//! Core error handling for the adapter.
//!
//! - [`AdapterError`] enumerates every failure a render can end with. Component errors
//!   ([`ConversionError`](crate::document::ConversionError),
//!   [`PathError`](crate::document::PathError), [`HookError`](crate::hooks::HookError),
//!   [`FunctionError`](crate::templating::FunctionError)) convert into it with `?`.
//! - [`ErrorContext`] wraps an error with details and a suggestion for terminal output.
//! - [`user_friendly_error`] turns any `anyhow::Error` coming out of the CLI into an
//!   [`ErrorContext`].
//!
//! Every error is terminal for the render that raised it: nothing is retried and no
//! partial manifest or binding is returned alongside an error.

pub mod error;

pub use error::{AdapterError, ErrorContext, user_friendly_error};
