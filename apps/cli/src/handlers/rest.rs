use super::{Session, print_json};
use anyhow::Result;

pub async fn fetch_rest(session: &Session, endpoint: &str, locale: &str) -> Result<()> {
    let content = session.strapi.rest().fetch(endpoint, locale).await?;
    print_json(&content)
}
