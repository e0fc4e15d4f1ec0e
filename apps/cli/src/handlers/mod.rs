pub mod fetch;
pub mod inspect;
pub mod rest;

use anyhow::{Context, Result};
use scms::domain::config::AppConfig;
use scms::store::CacheTagSet;
use scms::Strapi;
use serde_json::Value;
use std::sync::Arc;

/// Integration context of one CLI run, with an in-memory cache-tag set.
#[derive(Debug)]
pub struct Session {
    pub strapi: Strapi,
    pub tags: Arc<CacheTagSet>,
}

impl Session {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let tags = Arc::new(CacheTagSet::new());
        let strapi = Strapi::builder(config.strapi.clone())
            .tag_sink(Arc::clone(&tags) as Arc<dyn scms::store::CacheTagSink>)
            .build()
            .context("Failed to initialize the Strapi integration")?;
        Ok(Self { strapi, tags })
    }
}

/// Prints `value` as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
