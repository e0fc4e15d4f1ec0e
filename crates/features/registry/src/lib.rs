//! # Type Registry
//!
//! Turns the configured content types into [`ContentTypeDescriptor`]s: the singular/plural
//! names, action and mutation identifiers, state keys and capabilities every other crate works
//! with. The [`TypeRegistry`] is built once and looked up by any spelling of a type name.
//!
//! ```rust
//! use scms_domain::config::ContentTypeConfig;
//! use scms_registry::TypeRegistry;
//!
//! let registry = TypeRegistry::build(&[
//!     ContentTypeConfig::collection("blog-post"),
//!     ContentTypeConfig::single("homepage"),
//! ])
//! .unwrap();
//!
//! let post = registry.resolve("blogPosts").unwrap();
//! assert_eq!(post.actions().fetch_item, "fetchBlogPost");
//! assert!(registry.resolve("homepage").unwrap().is_single());
//! ```

mod descriptor;
mod error;
pub mod inflection;
mod registry;

pub use descriptor::{ActionIds, ContentTypeDescriptor, MutationIds, StateKeys};
pub use error::{RegistryError, RegistryErrorExt};
pub use registry::TypeRegistry;
