use std::borrow::Cow;

/// Content-type configuration problems. All of them are fatal at startup or first use.
#[scms_derive::scms_error]
pub enum RegistryError {
    /// The configured name is empty or cannot form identifiers.
    #[error("Invalid content type name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A collection type whose singular and plural forms coincide (e.g. `news`).
    #[error("Ambiguous content type{}: {message}", format_context(.context))]
    Ambiguous { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two descriptors generate the same state key, action or mutation id.
    #[error("Duplicate content type identifier{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown content type{}: {message}", format_context(.context))]
    UnknownType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operation is not generated for this type (e.g. a collection fetch on a single type).
    #[error("Unsupported operation{}: {message}", format_context(.context))]
    Unsupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
