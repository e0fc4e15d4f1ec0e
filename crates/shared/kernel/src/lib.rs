//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading and URL joins.
//!
//! ## Config loading
//! ```rust,no_run
//! use scms_kernel::config::load_config;
//! use scms_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
//! ```
//!
//! ## URL joins
//! ```rust
//! use scms_kernel::url::join_url;
//!
//! assert_eq!(join_url("https://cms.example.com/", "/uploads/a.png"), "https://cms.example.com/uploads/a.png");
//! ```
pub mod config;
pub mod url;

pub use scms_domain as domain;
