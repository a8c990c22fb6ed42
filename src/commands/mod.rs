use anyhow::{Result, anyhow};

use crate::cache::{CacheState, Document};

pub mod config;
pub mod export;
pub mod list;
pub mod organize;
pub mod people;
pub mod search;
pub mod show;
pub mod transcript;

/// Resolve a query to one document or fail with a readable message. A miss
/// is a negative result, not a crash; main turns it into exit code 1.
pub(crate) fn require_document<'a>(state: &'a CacheState, query: &str) -> Result<&'a Document> {
    state
        .find_document(query)
        .ok_or_else(|| anyhow!("no meeting matches '{}' (try `granola list`)", query))
}
