use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cache::CacheStore;
use crate::commands::require_document;
use crate::output;
use crate::people::extract_participants;

pub fn run(
    store: &mut CacheStore,
    query: &str,
    output_path: Option<&Path>,
    expand_groups: bool,
) -> Result<()> {
    let state = store.load()?;
    let doc = require_document(&state, query)?;
    let participants = extract_participants(doc, expand_groups);
    let markdown = output::markdown_export(doc, &participants);

    match output_path {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✅ Exported \"{}\" to {}", doc.display_title(), path.display());
        }
        None => print!("{}", markdown),
    }
    Ok(())
}
