//! Persistence keys: the freshness tokens stored next to every fetched item or collection.
//!
//! A view decides whether the content it displays is still valid by comparing the key it
//! *intends* to use with the key stored alongside the content. Nothing else (timestamps,
//! re-derivation) takes part in that decision.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque freshness token, usually the current navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistenceKey(String);

impl PersistenceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when `stored` was produced by a fetch that used this key.
    #[must_use]
    pub fn matches(&self, stored: Option<&Self>) -> bool {
        stored.is_some_and(|stored| stored == self)
    }
}

impl From<&str> for PersistenceKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PersistenceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for PersistenceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PersistenceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersistenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a view currently is: the inputs a [`PersistPolicy`] may derive a key from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewContext {
    route: String,
    component: Option<String>,
}

impl ViewContext {
    /// A view rendered at the given full navigation path (path + query string).
    pub fn at(route: impl Into<String>) -> Self {
        Self { route: route.into(), component: None }
    }

    /// Names the component instance rendering the view.
    #[must_use]
    pub fn component(mut self, tag: impl Into<String>) -> Self {
        self.component = Some(tag.into());
        self
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn component_tag(&self) -> Option<&str> {
        self.component.as_deref()
    }
}

/// How a binding derives the persistence key it fetches with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// The current navigation path. Content is refetched on every distinct route.
    #[default]
    Route,
    /// The component tag, so the content survives navigation within the same component.
    /// Falls back to the route when the view carries no component tag.
    Component,
    /// A fixed application-supplied key.
    Explicit(PersistenceKey),
}

impl PersistPolicy {
    #[must_use]
    pub fn resolve(&self, view: &ViewContext) -> PersistenceKey {
        match self {
            Self::Route => PersistenceKey::new(view.route()),
            Self::Component => {
                PersistenceKey::new(view.component_tag().unwrap_or_else(|| view.route()))
            },
            Self::Explicit(key) => key.clone(),
        }
    }
}
