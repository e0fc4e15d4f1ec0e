#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the storefront content workspace.
//!
//! ## Usage
//! Every crate that owns an error type depends on this crate and annotates its error enum:
//! ```toml
//! [dependencies]
//! scms-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro that turns an enum into a workspace error type.
///
/// # Features
///
/// * **Automatic Derives**: Injects `Debug` and `thiserror::Error` unless already derived.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context(...)`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants carrying a `source`
///   field (or a field marked `#[source]` / `#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
/// * **Formatting Helper**: Emits a module-local `format_context` function used inside
///   `#[error(...)]` messages.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. A variant that wraps a source error must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use scms_derive::scms_error;
/// use std::borrow::Cow;
///
/// #[scms_error]
/// pub enum FetchError {
///     #[error("Network error{}: {source}", format_context(.context))]
///     Network { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<Vec<u8>, FetchError> {
///     Ok(std::fs::read("content.json").context("Reading cached content")?)
/// }
/// ```
#[proc_macro_attribute]
pub fn scms_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
