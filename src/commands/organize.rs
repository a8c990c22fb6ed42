use anyhow::{Result, anyhow};
use serde_json::json;

use crate::cache::CacheStore;
use crate::output;

/// `granola folders [name]`: list folders, or the documents in one.
pub fn folders(store: &mut CacheStore, name: Option<&str>, json: bool) -> Result<()> {
    let state = store.load()?;

    let Some(name) = name else {
        let folders = state.folders();
        if json {
            let entries: Vec<_> = folders
                .iter()
                .map(|(id, f)| {
                    json!({"id": id, "title": f.title, "documents": f.document_ids.len()})
                })
                .collect();
            return output::print_json(&entries);
        }
        if folders.is_empty() {
            println!("No folders in the cache.");
            return Ok(());
        }
        for (_, folder) in folders {
            println!(
                "📁 {}  ({} documents)",
                folder.title.as_deref().unwrap_or("(untitled)"),
                folder.document_ids.len()
            );
        }
        return Ok(());
    };

    let folder = state
        .find_folder(name)
        .ok_or_else(|| anyhow!("no folder matches '{}'", name))?;
    let docs = state.folder_documents(folder);
    if json {
        output::print_json(&docs)?;
    } else {
        println!("📁 {}:\n", folder.title.as_deref().unwrap_or("(untitled)"));
        output::print_document_list(&docs);
    }
    Ok(())
}

/// `granola workspaces [name]`: list workspaces, or the documents in one.
pub fn workspaces(store: &mut CacheStore, name: Option<&str>, json: bool) -> Result<()> {
    let state = store.load()?;

    let Some(name) = name else {
        let spaces = state.workspaces();
        if json {
            let entries: Vec<_> = spaces
                .iter()
                .map(|(id, w)| json!({"id": id, "display_name": w.display_name}))
                .collect();
            return output::print_json(&entries);
        }
        if spaces.is_empty() {
            println!("No workspaces in the cache.");
            return Ok(());
        }
        for (id, workspace) in spaces {
            println!("🏢 {}  [{}]", workspace.display_name.as_deref().unwrap_or("(unnamed)"), id);
        }
        return Ok(());
    };

    let needle = name.to_lowercase();
    let (id, workspace) = state
        .workspaces()
        .into_iter()
        .find(|(id, w)| {
            id.as_str() == name
                || w.display_name.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
        })
        .ok_or_else(|| anyhow!("no workspace matches '{}'", name))?;

    let docs = state.workspace_documents(id);
    if json {
        output::print_json(&docs)?;
    } else {
        println!("🏢 {}:\n", workspace.display_name.as_deref().unwrap_or(id));
        output::print_document_list(&docs);
    }
    Ok(())
}
