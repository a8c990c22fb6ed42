use anyhow::Result;

use crate::cache::CacheStore;
use crate::output;

pub fn run(store: &mut CacheStore, query: &str, json: bool) -> Result<()> {
    let state = store.load()?;
    let hits = state.search_documents(query);

    if json {
        output::print_json(&hits)?;
    } else if hits.is_empty() {
        println!("No meetings match \"{}\".", query);
    } else {
        println!("🔎 {} meeting(s) matching \"{}\":\n", hits.len(), query);
        for doc in &hits {
            println!("{}", output::document_line(doc));
        }
    }
    Ok(())
}
