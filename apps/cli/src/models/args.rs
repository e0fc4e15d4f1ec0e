//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "scms")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Query Strapi content through the content store and print it as JSON")]
pub struct Cli {
    /// Configuration file (`scms.toml`, `scms.yaml`, `scms.json` by default)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the registered content types with their generated identifiers
    Types {},
    /// Print the namespaced module manifest
    Manifest {},
    /// Print the initial namespaced state
    State {},
    /// Fetch one item into the item slot
    Item(FetchArgs),
    /// Fetch a collection into the collection slot
    Collection(FetchArgs),
    /// Fetch one item into the static cache under --key
    Static(FetchArgs),
    /// Fetch a collection into the static cache, one entry per item
    StaticBatch {
        #[command(flatten)]
        query: QueryArgs,
        /// Item field used as the static key (defaults to the type's cache key)
        #[arg(long)]
        key_field: Option<String>,
    },
    /// GET a REST resource and rename locale-suffixed fields
    Rest {
        /// CMS-relative endpoint, e.g. `/pages?slug=imprint`
        endpoint: String,
        /// Locale suffix to strip, e.g. `de` for `title_de`
        #[arg(short, long)]
        locale: String,
    },
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Content type name (`article`, `articles`, `blog-post`, ...)
    #[arg(value_name = "TYPE")]
    pub type_name: String,
    /// GraphQL document, or `@path` to read it from a file
    pub query: String,
    /// Query variables as a JSON object
    #[arg(long)]
    pub vars: Option<String>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Persistence key the result is stored under
    #[arg(short, long, default_value = "/")]
    pub key: String,
}
