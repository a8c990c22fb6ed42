//! Read-only access to Granola's local cache file.
//!
//! The cache at `~/Library/Application Support/Granola/cache-v3.json` is
//! double-JSON-encoded: the top-level `cache` field is a JSON string that
//! must be parsed again to reach the actual state (documents, transcripts,
//! folders, workspaces). The store is externally owned; we only ever read it
//! and treat it as an occasionally-stale snapshot.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

// Granola caches grow into the hundreds of MB; refuse anything past this.
const MAX_CACHE_SIZE: u64 = 1024 * 1024 * 1024;

/// Errors from the cache store. Only the top-level missing/unreadable file
/// is fatal; malformed data nested inside records degrades silently.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(
        "Granola cache not found at {0}. Install the Granola desktop app and open it at least once, or point --cache at the file."
    )]
    CacheNotFound(PathBuf),
    #[error("cache file is {0} bytes, refusing to parse (limit {MAX_CACHE_SIZE})")]
    CacheTooLarge(u64),
    #[error("failed to read Granola cache: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse Granola cache: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outer layer of the double-encoded cache file.
#[derive(Debug, Deserialize)]
struct CacheFile {
    cache: String,
}

/// Inner layer after the second parse.
#[derive(Debug, Deserialize)]
struct CacheEnvelope {
    state: CacheState,
}

/// The parsed cache snapshot: documents plus optional side tables.
#[derive(Debug, Default, Deserialize)]
pub struct CacheState {
    #[serde(default)]
    pub documents: HashMap<String, Document>,
    #[serde(default)]
    pub transcripts: HashMap<String, Vec<TranscriptSegment>>,
    #[serde(default, rename = "documentLists")]
    pub folders: HashMap<String, Folder>,
    #[serde(default)]
    pub workspaces: HashMap<String, Workspace>,
    /// Raw people directory. Kept as loose JSON; nothing in the CLI joins
    /// against it yet.
    #[serde(default)]
    pub people: Option<Value>,
}

/// One meeting record. Everything beyond `id` is optional; the `people`
/// field stays loose JSON for the participant extractor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub people: Option<Value>,
    pub google_calendar_event: Option<CalendarEvent>,
    pub notes_markdown: Option<String>,
    pub notes_plain: Option<String>,
    pub summary: Option<String>,
    pub was_trashed: Option<bool>,
    pub workspace_id: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalendarEvent {
    pub summary: Option<String>,
    pub organizer: Option<EventOrganizer>,
    #[serde(default)]
    pub attendees: Vec<EventAttendee>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventOrganizer {
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventAttendee {
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
}

/// One transcript segment as stored in the cache (and returned by the API).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Folder {
    pub title: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Workspace {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

impl Document {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("(untitled)")
    }

    pub fn is_meeting(&self) -> bool {
        self.doc_type.as_deref() == Some("meeting") && self.was_trashed != Some(true)
    }

    /// Best-effort recency for sorting: `updated_at`, else `created_at`,
    /// else the epoch.
    pub fn updated(&self) -> DateTime<Utc> {
        [self.updated_at.as_deref(), self.created_at.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Flattened, lowercased attendee/creator names. This is the people
    /// surface of `search_documents`; emails are not part of it.
    fn people_name_blob(&self) -> String {
        let Some(people) = &self.people else {
            return String::new();
        };
        crate::people::extract_attendees(people)
            .into_iter()
            .map(|a| a.name)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Names and emails together, the wider surface that only
    /// `documents_by_person` matches against.
    fn people_contact_blob(&self) -> String {
        let Some(people) = &self.people else {
            return String::new();
        };
        crate::people::extract_attendees(people)
            .into_iter()
            .flat_map(|a| [Some(a.name), a.email])
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    fn calendar_attendee_blob(&self) -> String {
        let Some(event) = &self.google_calendar_event else {
            return String::new();
        };
        event
            .attendees
            .iter()
            .flat_map(|a| [a.display_name.as_deref(), a.email.as_deref()])
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Caller-owned, lazily-reloaded view over the cache file. The parsed state
/// is cached against the file's modification timestamp and re-read in full
/// when the timestamp moves. Single-threaded use only; freshness is
/// best-effort, not transactional.
#[derive(Debug, Default)]
pub struct CacheStore {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<CacheState>)>,
}

impl CacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cached: None }
    }

    /// Where Granola keeps its cache on this platform.
    pub fn default_path() -> PathBuf {
        if cfg!(target_os = "macos") {
            dirs::home_dir()
                .unwrap_or_default()
                .join("Library/Application Support/Granola/cache-v3.json")
        } else {
            dirs::config_dir().unwrap_or_default().join("Granola/cache-v3.json")
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the current snapshot, reusing the parsed state when the file's
    /// modification timestamp is unchanged.
    pub fn load(&mut self) -> Result<Arc<CacheState>, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::CacheNotFound(self.path.clone()));
        }
        let metadata = fs::metadata(&self.path)?;
        let modified = metadata.modified()?;
        if let Some((stamp, state)) = &self.cached {
            if *stamp == modified {
                debug!("cache unchanged since last load, reusing parsed state");
                return Ok(Arc::clone(state));
            }
        }
        if metadata.len() > MAX_CACHE_SIZE {
            return Err(StoreError::CacheTooLarge(metadata.len()));
        }

        let raw = fs::read_to_string(&self.path)?;
        let outer: CacheFile = serde_json::from_str(&raw)?;
        let envelope: CacheEnvelope = serde_json::from_str(&outer.cache)?;
        info!(
            "loaded cache: {} documents, {} transcripts",
            envelope.state.documents.len(),
            envelope.state.transcripts.len()
        );

        let state = Arc::new(envelope.state);
        self.cached = Some((modified, Arc::clone(&state)));
        Ok(state)
    }
}

impl CacheState {
    /// All documents, most recently updated first.
    pub fn documents(&self) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self.documents.values().collect();
        docs.sort_by(|a, b| b.updated().cmp(&a.updated()).then_with(|| a.id.cmp(&b.id)));
        docs
    }

    /// Documents of type `meeting`, excluding soft-trashed records.
    pub fn meetings(&self) -> Vec<&Document> {
        self.documents().into_iter().filter(|d| d.is_meeting()).collect()
    }

    /// Exact-id lookup first; otherwise fuzzy title match: every lowercase
    /// query token longer than two characters must appear in the title, and
    /// the most recently updated candidate wins.
    pub fn find_document(&self, query: &str) -> Option<&Document> {
        if let Some(doc) = self.documents.get(query) {
            return Some(doc);
        }
        if let Some(doc) = self.documents.values().find(|d| d.id == query) {
            return Some(doc);
        }

        let needle = query.to_lowercase();
        let tokens: Vec<&str> = needle.split_whitespace().filter(|w| w.len() > 2).collect();
        if tokens.is_empty() {
            return None;
        }
        self.documents
            .values()
            .filter(|d| {
                let title = d.title.as_deref().unwrap_or_default().to_lowercase();
                tokens.iter().all(|t| title.contains(t))
            })
            .max_by(|a, b| a.updated().cmp(&b.updated()).then_with(|| b.id.cmp(&a.id)))
    }

    /// Case-insensitive substring search over title, plain notes and the
    /// flattened people names, most recent first.
    pub fn search_documents(&self, query: &str) -> Vec<&Document> {
        let needle = query.to_lowercase();
        let mut hits: Vec<&Document> = self
            .documents
            .values()
            .filter(|d| {
                d.title.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
                    || d.notes_plain.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
                    || d.people_name_blob().contains(&needle)
            })
            .collect();
        hits.sort_by(|a, b| b.updated().cmp(&a.updated()).then_with(|| a.id.cmp(&b.id)));
        hits
    }

    /// Documents involving a person: matches the title, the normalized
    /// people names, the calendar-event attendee display names/emails, or
    /// the raw nested creator/attendees JSON. Any surface matching counts.
    pub fn documents_by_person(&self, query: &str) -> Vec<&Document> {
        let needle = query.to_lowercase();
        let mut hits: Vec<&Document> = self
            .documents
            .values()
            .filter(|d| {
                d.title.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
                    || d.people_contact_blob().contains(&needle)
                    || d.calendar_attendee_blob().contains(&needle)
                    || d.people
                        .as_ref()
                        .map(|p| p.to_string().to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect();
        hits.sort_by(|a, b| b.updated().cmp(&a.updated()).then_with(|| a.id.cmp(&b.id)));
        hits
    }

    pub fn transcript(&self, document_id: &str) -> Option<&Vec<TranscriptSegment>> {
        self.transcripts.get(document_id)
    }

    /// Folders sorted by title.
    pub fn folders(&self) -> Vec<(&String, &Folder)> {
        let mut folders: Vec<(&String, &Folder)> = self.folders.iter().collect();
        folders.sort_by_key(|(_, f)| f.title.clone().unwrap_or_default().to_lowercase());
        folders
    }

    pub fn find_folder(&self, name: &str) -> Option<&Folder> {
        let needle = name.to_lowercase();
        self.folders()
            .into_iter()
            .map(|(_, f)| f)
            .find(|f| f.title.as_deref().unwrap_or_default().to_lowercase().contains(&needle))
    }

    /// Membership join from a folder to its documents, most recent first.
    pub fn folder_documents(&self, folder: &Folder) -> Vec<&Document> {
        let mut docs: Vec<&Document> =
            folder.document_ids.iter().filter_map(|id| self.documents.get(id)).collect();
        docs.sort_by(|a, b| b.updated().cmp(&a.updated()).then_with(|| a.id.cmp(&b.id)));
        docs
    }

    /// Workspaces sorted by display name.
    pub fn workspaces(&self) -> Vec<(&String, &Workspace)> {
        let mut spaces: Vec<(&String, &Workspace)> = self.workspaces.iter().collect();
        spaces.sort_by_key(|(_, w)| w.display_name.clone().unwrap_or_default().to_lowercase());
        spaces
    }

    /// Documents belonging to a workspace, most recent first.
    pub fn workspace_documents(&self, workspace_id: &str) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self
            .documents
            .values()
            .filter(|d| d.workspace_id.as_deref() == Some(workspace_id))
            .collect();
        docs.sort_by(|a, b| b.updated().cmp(&a.updated()).then_with(|| a.id.cmp(&b.id)));
        docs
    }
}
