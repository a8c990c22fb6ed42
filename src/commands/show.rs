use anyhow::Result;
use serde_json::json;

use crate::cache::CacheStore;
use crate::commands::require_document;
use crate::output;
use crate::people::extract_participants;

pub fn run(store: &mut CacheStore, query: &str, json: bool) -> Result<()> {
    let state = store.load()?;
    let doc = require_document(&state, query)?;
    let participants = extract_participants(doc, false);

    if json {
        output::print_json(&json!({
            "document": doc,
            "participants": participants,
        }))?;
    } else {
        output::print_document_detail(doc, &participants);
    }
    Ok(())
}
