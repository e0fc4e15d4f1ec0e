use super::{Session, print_json};
use crate::models::args::{FetchArgs, QueryArgs};
use anyhow::{Context, Result, bail};
use scms::store::{FetchRequest, StaticBatchRequest};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Which slot a fetch command writes.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    Item,
    Collection,
    Static,
}

/// Reads the query text (inline or `@file`) and parses `--vars`.
fn load_query(args: &QueryArgs) -> Result<(String, Value)> {
    let query = match args.query.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file '{path}'"))?,
        None => args.query.clone(),
    };

    let variables = match &args.vars {
        Some(vars) => {
            let parsed: Value = serde_json::from_str(vars).context("--vars is not valid JSON")?;
            if !parsed.is_object() {
                bail!("--vars must be a JSON object");
            }
            parsed
        },
        None => Value::Object(Map::new()),
    };

    Ok((query, variables))
}

pub async fn fetch(session: &Session, target: Target, args: &FetchArgs) -> Result<()> {
    let (query, variables) = load_query(&args.query)?;
    let slice = session.strapi.store().slice(&args.query.type_name)?;
    let request = FetchRequest::new(query, args.key.as_str()).variables(variables);

    debug!(content_type = slice.descriptor().singular(), ?target, "Running fetch command");

    let data = match target {
        Target::Item => {
            let item = slice.fetch_item(&request).await?;
            item.map_or(Value::Null, |item| item.as_ref().clone())
        },
        Target::Collection => Value::Array(slice.fetch_collection(&request).await?.to_vec()),
        Target::Static => {
            let item = slice.fetch_static(&request).await?;
            item.map_or(Value::Null, |item| item.as_ref().clone())
        },
    };

    print_json(&json!({
        "data": data,
        "persistenceKey": args.key,
        "tags": session.tags.snapshot(),
    }))
}

pub async fn fetch_static_batch(
    session: &Session,
    args: &QueryArgs,
    key_field: Option<&str>,
) -> Result<()> {
    let (query, variables) = load_query(args)?;
    let slice = session.strapi.store().slice(&args.type_name)?;

    let mut request = StaticBatchRequest::new(query).variables(variables);
    if let Some(field) = key_field {
        request = request.key_field(field);
    }

    let report = slice.fetch_static_collection(&request).await?;
    let entries = slice
        .static_keys()
        .into_iter()
        .filter_map(|key| {
            let item = slice.static_item(key.as_str())?;
            Some((key.to_string(), item.as_ref().clone()))
        })
        .collect::<Map<_, _>>();

    print_json(&json!({
        "report": report,
        "data": entries,
        "tags": session.tags.snapshot(),
    }))
}
