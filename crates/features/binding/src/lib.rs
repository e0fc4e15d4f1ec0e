//! # Binding Adapters
//!
//! Connect a view to the content store. A binding resolves its persistence key from a
//! [`ViewContext`], asks its query source for the query, and decides on each lifecycle hook
//! whether stored content is still fresh:
//!
//! | hook       | item / collection                               | static                       |
//! |------------|-------------------------------------------------|------------------------------|
//! | `prefetch` | fetch unless on-demand                          | fetch unless on-demand       |
//! | `mount`    | fetch unless on-demand or fresh                 | show cached, else fetch      |
//! | `navigate` | fetch unless on-demand or the key still matches | fetch unless on-demand       |
//!
//! A binding never runs two fetches at once; its error handler sees every fetch error before
//! the error is returned.
//!
//! [`RestContent`] is the REST fallback for resources outside GraphQL.
//!
//! [`ViewContext`]: scms_domain::ViewContext

mod collection;
mod common;
mod item;
mod options;
pub mod rest;
mod statics;

pub use collection::CollectionBinding;
pub use common::{ErrorHandler, QuerySource};
pub use item::ItemBinding;
pub use options::{BindingOptions, FetchOutcome, QuerySpec};
pub use rest::RestContent;
pub use statics::StaticBinding;
