use crate::descriptor::ContentTypeDescriptor;
use crate::error::RegistryError;
use crate::inflection::pluralize;
use convert_case::{Case, Casing};
use fxhash::FxHashMap;
use scms_domain::config::ContentTypeConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered, immutable set of content-type descriptors, built once at startup.
///
/// Cloning is cheap; descriptors are shared.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    descriptors: Arc<[Arc<ContentTypeDescriptor>]>,
}

impl TypeRegistry {
    /// Builds descriptors in configuration order.
    ///
    /// # Errors
    /// Fails on the first invalid descriptor, or when two descriptors share any state key,
    /// action id or mutation id ([`RegistryError::Duplicate`]).
    pub fn build(configs: &[ContentTypeConfig]) -> Result<Self, RegistryError> {
        let mut owners: FxHashMap<&str, (&'static str, usize)> = FxHashMap::default();
        let descriptors = configs
            .iter()
            .map(ContentTypeDescriptor::new)
            .collect::<Result<Vec<_>, _>>()?;

        for (idx, descriptor) in descriptors.iter().enumerate() {
            for (kind, id) in descriptor.identifiers() {
                if let Some((other_kind, owner)) = owners.insert(id, (kind, idx)) {
                    return Err(RegistryError::Duplicate {
                        message: format!(
                            "{kind} '{id}' of '{}' collides with {other_kind} of '{}'",
                            descriptor.logical_name(),
                            descriptors[owner].logical_name()
                        )
                        .into(),
                        context: None,
                    });
                }
            }
            debug!(
                content_type = descriptor.normalized_name(),
                singular = descriptor.singular(),
                plural = descriptor.plural(),
                single = descriptor.is_single(),
                "Content type registered"
            );
        }

        info!(count = descriptors.len(), "Type registry built");

        Ok(Self { descriptors: descriptors.into_iter().map(Arc::new).collect() })
    }

    /// Looks a type up by any of its names (`article`, `articles`, `blog-post`, ...).
    ///
    /// Single types match on their normalized or singular name first; otherwise the pluralized
    /// input is matched against every type's plural, so `homepages` still finds the single
    /// type `homepage`. Never fails; unknown names yield `None`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Arc<ContentTypeDescriptor>> {
        let normalized = name.trim().to_case(Case::Camel);
        if normalized.is_empty() {
            return None;
        }

        self.descriptors
            .iter()
            .find(|d| {
                d.is_single() && (d.normalized_name() == normalized || d.singular() == normalized)
            })
            .or_else(|| {
                let plural = pluralize(&normalized);
                self.descriptors.iter().find(|d| d.plural() == plural)
            })
    }

    /// Fail-fast variant of [`TypeRegistry::resolve`].
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownType`] when no descriptor matches.
    pub fn require(&self, name: &str) -> Result<&Arc<ContentTypeDescriptor>, RegistryError> {
        self.resolve(name).ok_or_else(|| RegistryError::UnknownType {
            message: format!("unknown content type \"{name}\"").into(),
            context: None,
        })
    }

    /// Position of a descriptor of this registry, by identity.
    #[must_use]
    pub fn position(&self, descriptor: &Arc<ContentTypeDescriptor>) -> Option<usize> {
        self.descriptors.iter().position(|d| Arc::ptr_eq(d, descriptor))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<ContentTypeDescriptor>> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentTypeDescriptor>> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
