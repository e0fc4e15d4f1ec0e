use serde::Serialize;
use std::fmt;

/// Root marker shared by every tag emitted for CMS content.
pub const CACHE_TAG_ROOT: &str = "S";

/// An opaque invalidation marker consumed by an external page/response cache.
///
/// Three shapes exist: `S` (any CMS content), `S:<type>` (any item of a type) and
/// `S:<type>:<id>` (one item).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheTag(String);

impl CacheTag {
    #[must_use]
    pub fn root() -> Self {
        Self(CACHE_TAG_ROOT.to_owned())
    }

    #[must_use]
    pub fn content_type(type_name: &str) -> Self {
        Self(format!("{CACHE_TAG_ROOT}:{type_name}"))
    }

    #[must_use]
    pub fn item(type_name: &str, id: &str) -> Self {
        Self(format!("{CACHE_TAG_ROOT}:{type_name}:{id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
