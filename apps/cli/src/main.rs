pub mod handlers;
pub mod models;

use crate::handlers::fetch::Target;
use crate::handlers::{Session, fetch, inspect, rest};
use crate::models::args::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use scms_logger::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = scms::load_config(cli.config.as_deref())
        .context("Critical: Configuration is missing or malformed")?;
    let _log = Logger::from_config(env!("CARGO_BIN_NAME"), &config.log)?;

    let session = Session::open(&config)?;

    match cli.command {
        Commands::Types {} => inspect::list_types(&session)?,
        Commands::Manifest {} => inspect::manifest(&session)?,
        Commands::State {} => inspect::state(&session)?,
        Commands::Item(args) => fetch::fetch(&session, Target::Item, &args).await?,
        Commands::Collection(args) => fetch::fetch(&session, Target::Collection, &args).await?,
        Commands::Static(args) => fetch::fetch(&session, Target::Static, &args).await?,
        Commands::StaticBatch { query, key_field } => {
            fetch::fetch_static_batch(&session, &query, key_field.as_deref()).await?;
        },
        Commands::Rest { endpoint, locale } => rest::fetch_rest(&session, &endpoint, &locale).await?,
    }

    Ok(())
}
