use scms_registry::RegistryError;
use std::borrow::Cow;

/// Errors surfaced by store mutations, fetch operations and the module surface.
#[scms_derive::scms_error]
pub enum StoreError {
    /// Non-2xx answer, network failure or undecodable body.
    #[error("Transport error{}: {source}", format_context(.context))]
    Transport { source: scms_transport::TransportError, context: Option<Cow<'static, str>> },

    /// A 2xx answer carrying a non-empty GraphQL `errors` array; messages joined with ` | `.
    #[error("GraphQL error{}: {message}", format_context(.context))]
    GraphQl { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Unknown type, unsupported operation, unknown identifier or missing persistence key.
    #[error("Configuration error{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Stored content does not match the type requested by a typed read.
    #[error("Decode error{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl StoreError {
    pub(crate) fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into(), context: None }
    }

    /// `true` for configuration problems, which are fatal rather than transient.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl From<RegistryError> for StoreError {
    fn from(error: RegistryError) -> Self {
        Self::Configuration { message: error.to_string().into(), context: None }
    }
}
