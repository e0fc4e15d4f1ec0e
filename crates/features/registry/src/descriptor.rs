use crate::error::RegistryError;
use crate::inflection::{pluralize, singularize};
use convert_case::{Case, Casing};
use scms_domain::config::ContentTypeConfig;
use scms_domain::SliceCapabilities;
use serde::Serialize;

/// Action identifiers generated for one content type (`fetchArticle`, `fetchArticles`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionIds {
    pub fetch_item: String,
    pub fetch_collection: Option<String>,
    pub fetch_static: Option<String>,
    pub fetch_static_collection: Option<String>,
}

/// Mutation identifiers (`SET_ARTICLE`, `SET_ARTICLES`, `SET_ARTICLES_STATIC`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationIds {
    pub set_item: String,
    pub set_collection: Option<String>,
    pub set_static: Option<String>,
}

/// Keys under which the slice appears in the namespaced state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateKeys {
    pub item: String,
    pub item_persistence_key: String,
    pub collection: Option<String>,
    pub static_map: Option<String>,
    pub collection_persistence_key: Option<String>,
}

/// Static metadata describing one content type: its names, identifiers and capabilities.
///
/// Every identifier is computed once here; nothing is re-derived at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDescriptor {
    logical_name: String,
    normalized_name: String,
    singular: String,
    plural: String,
    single: bool,
    cache_key: String,
    cache_items: bool,
    capabilities: SliceCapabilities,
    actions: ActionIds,
    mutations: MutationIds,
    state_keys: StateKeys,
}

impl ContentTypeDescriptor {
    /// Builds the descriptor and its identifier tables.
    ///
    /// # Errors
    /// * [`RegistryError::InvalidName`] for names that are empty or do not start with a letter.
    /// * [`RegistryError::Ambiguous`] for collection types with identical singular and plural
    ///   forms, whose item and collection slots would collide.
    pub fn new(config: &ContentTypeConfig) -> Result<Self, RegistryError> {
        let normalized_name = config.name.trim().to_case(Case::Camel);

        if !normalized_name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(RegistryError::InvalidName {
                message: format!("'{}' cannot be used as a content type name", config.name).into(),
                context: Some("Names must start with a letter".into()),
            });
        }
        if config.cache_key.trim().is_empty() {
            return Err(RegistryError::InvalidName {
                message: format!("'{normalized_name}' declares an empty cache key").into(),
                context: None,
            });
        }

        let singular = singularize(&normalized_name);
        let plural = pluralize(&normalized_name);

        if !config.single && singular == plural {
            return Err(RegistryError::Ambiguous {
                message: format!(
                    "collection type '{normalized_name}' has identical singular and plural forms"
                )
                .into(),
                context: Some("Declare it as a single type or rename it".into()),
            });
        }

        let capabilities = SliceCapabilities::for_type(config.single);
        let collection = !config.single;
        let upper_singular = upper_snake(&singular);
        let upper_plural = upper_snake(&plural);

        let actions = ActionIds {
            fetch_item: format!("fetch{}", upper_first(&singular)),
            fetch_collection: collection.then(|| format!("fetch{}", upper_first(&plural))),
            fetch_static: collection.then(|| format!("fetch{}Static", upper_first(&plural))),
            fetch_static_collection: collection
                .then(|| format!("fetch{}StaticCollection", upper_first(&plural))),
        };

        let mutations = MutationIds {
            set_item: format!("SET_{upper_singular}"),
            set_collection: collection.then(|| format!("SET_{upper_plural}")),
            set_static: collection.then(|| format!("SET_{upper_plural}_STATIC")),
        };

        let state_keys = StateKeys {
            item: singular.clone(),
            item_persistence_key: format!("{singular}PersistenceKey"),
            collection: collection.then(|| plural.clone()),
            static_map: collection.then(|| format!("{plural}Static")),
            collection_persistence_key: collection.then(|| format!("{plural}PersistenceKey")),
        };

        Ok(Self {
            logical_name: config.name.clone(),
            normalized_name,
            singular,
            plural,
            single: config.single,
            cache_key: config.cache_key.clone(),
            cache_items: config.cache_items,
            capabilities,
            actions,
            mutations,
            state_keys,
        })
    }

    /// The name as configured.
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// camelCase form of the configured name.
    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    #[must_use]
    pub fn singular(&self) -> &str {
        &self.singular
    }

    #[must_use]
    pub fn plural(&self) -> &str {
        &self.plural
    }

    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.single
    }

    /// Field used to build per-item cache tags and static batch keys.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    #[must_use]
    pub const fn cache_items(&self) -> bool {
        self.cache_items
    }

    #[must_use]
    pub const fn capabilities(&self) -> SliceCapabilities {
        self.capabilities
    }

    #[must_use]
    pub const fn actions(&self) -> &ActionIds {
        &self.actions
    }

    #[must_use]
    pub const fn mutations(&self) -> &MutationIds {
        &self.mutations
    }

    #[must_use]
    pub const fn state_keys(&self) -> &StateKeys {
        &self.state_keys
    }

    /// Fails unless the type supports every operation in `required`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Unsupported`] naming the missing capabilities.
    pub fn ensure(&self, required: SliceCapabilities) -> Result<(), RegistryError> {
        let missing = required.difference(self.capabilities);
        if missing.is_empty() {
            return Ok(());
        }
        Err(RegistryError::Unsupported {
            message: format!("'{}' is a single type without {missing:?}", self.singular).into(),
            context: None,
        })
    }

    /// Every generated identifier paired with the kind of identifier it is.
    pub fn identifiers(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let keys = &self.state_keys;
        let actions = &self.actions;
        let mutations = &self.mutations;

        [
            ("state key", Some(&keys.item)),
            ("state key", Some(&keys.item_persistence_key)),
            ("state key", keys.collection.as_ref()),
            ("state key", keys.static_map.as_ref()),
            ("state key", keys.collection_persistence_key.as_ref()),
            ("action", Some(&actions.fetch_item)),
            ("action", actions.fetch_collection.as_ref()),
            ("action", actions.fetch_static.as_ref()),
            ("action", actions.fetch_static_collection.as_ref()),
            ("mutation", Some(&mutations.set_item)),
            ("mutation", mutations.set_collection.as_ref()),
            ("mutation", mutations.set_static.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id.as_str())))
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn upper_snake(word: &str) -> String {
    word.to_case(Case::Snake).to_uppercase()
}
