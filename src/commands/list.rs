use anyhow::Result;
use log::info;
use serde_json::Value;

use crate::api::ApiClient;
use crate::auth;
use crate::cache::{CacheStore, Document};
use crate::config::Config;
use crate::output;

pub async fn run(
    store: &mut CacheStore,
    config: &Config,
    limit: Option<usize>,
    remote: bool,
    json: bool,
) -> Result<()> {
    let limit = limit.or(config.output.default_limit).unwrap_or(20);

    if remote {
        return run_remote(config, limit, json).await;
    }

    let state = store.load()?;
    let meetings: Vec<&Document> = state.meetings().into_iter().take(limit).collect();
    info!("listing {} meetings from the cache", meetings.len());
    if json {
        output::print_json(&meetings)?;
    } else {
        output::print_document_list(&meetings);
    }
    Ok(())
}

async fn run_remote(config: &Config, limit: usize, json: bool) -> Result<()> {
    let credentials = config
        .granola
        .credentials_path
        .clone()
        .unwrap_or_else(auth::default_credentials_path);
    let token = auth::load_access_token(&credentials)?;
    let docs = ApiClient::new(token).list_documents(limit).await?;

    if json {
        return output::print_json(&docs);
    }
    if docs.is_empty() {
        println!("No meetings returned by the API.");
        return Ok(());
    }
    for doc in &docs {
        let title = doc.get("title").and_then(Value::as_str).unwrap_or("(untitled)");
        let updated = doc.get("updated_at").and_then(Value::as_str);
        let id = doc.get("id").and_then(Value::as_str).unwrap_or("?");
        println!("📋 {}  —  {}  [{}]", title, output::format_timestamp(updated), id);
    }
    println!("\n{} meeting(s)", docs.len());
    Ok(())
}
