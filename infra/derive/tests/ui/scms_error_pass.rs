use scms_derive::scms_error;
use std::borrow::Cow;

#[scms_error]
pub enum ParseError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Bad payload{}: {message}", format_context(.context))]
    Payload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), ParseError> {
    let failed: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
    failed.context("reading payload")
}

fn main() {
    let _ = read();
    let _ = ParseError::from("static message");
}
