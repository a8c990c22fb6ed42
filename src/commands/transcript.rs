use anyhow::{Result, anyhow};

use crate::api::ApiClient;
use crate::auth;
use crate::cache::CacheStore;
use crate::commands::require_document;
use crate::config::Config;
use crate::output;

pub async fn run(
    store: &mut CacheStore,
    config: &Config,
    query: &str,
    remote: bool,
    json: bool,
) -> Result<()> {
    let state = store.load()?;
    let doc = require_document(&state, query)?;
    let title = doc.display_title().to_string();
    let doc_id = doc.id.clone();

    let segments = if remote {
        let credentials = config
            .granola
            .credentials_path
            .clone()
            .unwrap_or_else(auth::default_credentials_path);
        let token = auth::load_access_token(&credentials)?;
        ApiClient::new(token).fetch_transcript(&doc_id).await?
    } else {
        state
            .transcript(&doc_id)
            .cloned()
            .ok_or_else(|| {
                anyhow!("no cached transcript for '{}' (try --remote to fetch it)", title)
            })?
    };

    if json {
        output::print_json(&segments)?;
    } else {
        output::print_transcript(&title, &segments);
    }
    Ok(())
}
