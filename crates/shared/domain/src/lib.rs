//! # Domain Models
//!
//! Pure types shared by every crate of the content bridge, with minimal dependencies
//! (`serde`, `bitflags`). Keep it lean: no I/O, networking, or heavy logic, just data and
//! simple helpers.

pub mod cache;
pub mod capabilities;
pub mod config;
pub mod persistence;

pub use cache::CacheTag;
pub use capabilities::SliceCapabilities;
pub use persistence::{PersistPolicy, PersistenceKey, ViewContext};
