use std::borrow::Cow;

/// Startup and facade failures.
#[scms_derive::scms_error]
pub enum StrapiError {
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: scms_kernel::config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Content type error{}: {source}", format_context(.context))]
    Registry { source: scms_registry::RegistryError, context: Option<Cow<'static, str>> },

    #[error("Transport error{}: {source}", format_context(.context))]
    Transport { source: scms_transport::TransportError, context: Option<Cow<'static, str>> },

    #[error("Store error{}: {source}", format_context(.context))]
    Store { source: scms_store::StoreError, context: Option<Cow<'static, str>> },
}
