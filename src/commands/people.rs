use anyhow::Result;

use crate::cache::CacheStore;
use crate::commands::require_document;
use crate::output;
use crate::people::extract_participants;

/// `granola people <query>`: organizer + deduplicated attendees, with
/// optional group expansion.
pub fn run(store: &mut CacheStore, query: &str, expand_groups: bool, json: bool) -> Result<()> {
    let state = store.load()?;
    let doc = require_document(&state, query)?;
    let participants = extract_participants(doc, expand_groups);

    if json {
        output::print_json(&participants)?;
    } else {
        println!("📋 {}\n", doc.display_title());
        output::print_participants(&participants);
    }
    Ok(())
}

/// `granola person <name-or-email>`: every meeting the person shows up in,
/// across any of the search surfaces.
pub fn by_person(store: &mut CacheStore, query: &str, json: bool) -> Result<()> {
    let state = store.load()?;
    let hits = state.documents_by_person(query);

    if json {
        output::print_json(&hits)?;
    } else if hits.is_empty() {
        println!("No meetings involve \"{}\".", query);
    } else {
        println!("👥 {} meeting(s) involving \"{}\":\n", hits.len(), query);
        for doc in &hits {
            println!("{}", output::document_line(doc));
        }
    }
    Ok(())
}
