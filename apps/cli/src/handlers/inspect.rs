use super::{Session, print_json};
use anyhow::{Context, Result};
use serde_json::Value;

pub fn list_types(session: &Session) -> Result<()> {
    let types = session
        .strapi
        .registry()
        .iter()
        .map(|descriptor| serde_json::to_value(descriptor.as_ref()))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to serialize content types")?;
    print_json(&Value::Array(types))
}

pub fn manifest(session: &Session) -> Result<()> {
    let manifest = serde_json::to_value(session.strapi.store().manifest())
        .context("Failed to serialize the module manifest")?;
    print_json(&manifest)
}

pub fn state(session: &Session) -> Result<()> {
    print_json(&session.strapi.store().state())
}
