//! Structured GraphQL documents.
//!
//! Views usually ship raw query strings, but building the selection in code keeps variable
//! definitions and arguments in one place:
//!
//! ```rust
//! use scms_transport::query::{Argument, Field, GraphqlQuery};
//!
//! let query = GraphqlQuery::named("BlogPosts")
//!     .variable("limit", "Int")
//!     .field(
//!         Field::new("blogPosts")
//!             .arg("limit", Argument::variable("limit"))
//!             .arg("sort", Argument::literal("published_at:desc"))
//!             .select(["id", "title"]),
//!     );
//!
//! assert_eq!(
//!     query.render(),
//!     r#"query BlogPosts($limit: Int) { blogPosts(limit: $limit, sort: "published_at:desc") { id title } }"#
//! );
//! ```

use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Write;

/// What the transport sends as the `query` member of the request body.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    Raw(String),
    Structured(GraphqlQuery),
}

impl QueryBody {
    /// The query text as sent over the wire.
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Raw(query) => Cow::Borrowed(query),
            Self::Structured(query) => Cow::Owned(query.render()),
        }
    }
}

impl From<&str> for QueryBody {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

impl From<String> for QueryBody {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<GraphqlQuery> for QueryBody {
    fn from(value: GraphqlQuery) -> Self {
        Self::Structured(value)
    }
}

/// A `query` operation: optional name, variable definitions and a root selection set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphqlQuery {
    name: Option<String>,
    variables: Vec<(String, String)>,
    fields: Vec<Field>,
}

impl GraphqlQuery {
    /// An anonymous query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    /// Declares `$name: type` (e.g. `("id", "ID!")`).
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.variables.push((name.into(), ty.into()));
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Renders the document on a single line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("query");
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(name);
        }
        if !self.variables.is_empty() {
            let defs = self
                .variables
                .iter()
                .map(|(name, ty)| format!("${name}: {ty}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(out, "({defs})");
        }
        out.push(' ');
        write_selection(&mut out, &self.fields);
        out
    }
}

/// A selected field with optional alias, arguments and sub-selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    alias: Option<String>,
    arguments: Vec<(String, Argument)>,
    selection: Vec<Self>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), alias: None, arguments: Vec::new(), selection: Vec::new() }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: Argument) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Adds leaf fields by name.
    #[must_use]
    pub fn select<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.extend(names.into_iter().map(Self::new));
        self
    }

    /// Adds a nested field with its own selection.
    #[must_use]
    pub fn child(mut self, field: Self) -> Self {
        self.selection.push(field);
        self
    }

    fn write(&self, out: &mut String) {
        if let Some(alias) = &self.alias {
            let _ = write!(out, "{alias}: ");
        }
        out.push_str(&self.name);
        if !self.arguments.is_empty() {
            out.push('(');
            write_arguments(out, &self.arguments);
            out.push(')');
        }
        if !self.selection.is_empty() {
            out.push(' ');
            write_selection(out, &self.selection);
        }
    }
}

/// An argument value: a `$variable` reference, a JSON literal, or an input object mixing both.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Variable(String),
    Literal(Value),
    Object(Vec<(String, Self)>),
}

impl Argument {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// An input object, e.g. `where: { slug: $slug }`.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Object(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::Variable(name) => {
                out.push('$');
                out.push_str(name);
            },
            Self::Literal(value) => write_literal(out, value),
            Self::Object(entries) => {
                out.push('{');
                write_arguments(out, entries);
                out.push('}');
            },
        }
    }
}

fn write_selection(out: &mut String, fields: &[Field]) {
    out.push('{');
    for field in fields {
        out.push(' ');
        field.write(out);
    }
    out.push_str(" }");
}

fn write_arguments(out: &mut String, arguments: &[(String, Argument)]) {
    for (idx, (name, value)) in arguments.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(": ");
        value.write(out);
    }
}

/// GraphQL literal syntax: object keys are bare names, everything else matches JSON.
fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (idx, (key, value)) in map.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_literal(out, value);
            }
            out.push('}');
        },
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item);
            }
            out.push(']');
        },
        scalar => {
            let _ = write!(out, "{scalar}");
        },
    }
}
