use std::borrow::Cow;

/// Failures talking to the CMS over HTTP.
#[scms_derive::scms_error]
pub enum TransportError {
    /// Connection, TLS, timeout or body streaming failures reported by the HTTP client.
    #[error("HTTP request error{}: {source}", format_context(.context))]
    Request { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The CMS answered with a non-2xx status.
    #[error("Unexpected HTTP status{}: {status} {reason}", format_context(.context))]
    Status { status: u16, reason: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The response body is not valid JSON.
    #[error("Response decode error{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid URL{}: {message}", format_context(.context))]
    InvalidUrl { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal transport error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl TransportError {
    /// HTTP status of a [`TransportError::Status`] failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
