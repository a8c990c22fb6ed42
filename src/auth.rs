//! Access-token extraction from Granola's local credential file.
//!
//! Granola stores auth state in `supabase.json` next to the cache. Like the
//! cache itself, the token blobs are double-encoded: `workos_tokens` (and on
//! older installs `cognito_tokens`) is a JSON string containing an
//! `access_token` field. The token is never logged and never written back.

use anyhow::{Context, Result, anyhow};
use log::debug;
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CredentialFile {
    workos_tokens: Option<String>,
    cognito_tokens: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBlob {
    access_token: Option<String>,
}

/// Where Granola keeps its credential file on this platform.
pub fn default_credentials_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support/Granola/supabase.json")
    } else {
        dirs::config_dir().unwrap_or_default().join("Granola/supabase.json")
    }
}

/// Read the API access token, preferring WorkOS tokens over legacy Cognito.
pub fn load_access_token(path: &PathBuf) -> Result<SecretString> {
    if !path.exists() {
        return Err(anyhow!(
            "Granola credentials not found at {}. Sign in to the Granola desktop app first.",
            path.display()
        ));
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;
    let file: CredentialFile =
        serde_json::from_str(&raw).context("failed to parse credential file")?;

    let (blob, source) = match (&file.workos_tokens, &file.cognito_tokens) {
        (Some(blob), _) => (blob, "workos"),
        (None, Some(blob)) => (blob, "cognito"),
        (None, None) => return Err(anyhow!("credential file contains no token blob")),
    };
    debug!("using {} token blob", source);

    let tokens: TokenBlob = serde_json::from_str(blob)
        .context("failed to parse the double-encoded token blob")?;
    let access_token = tokens
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("credential file carries no access_token"))?;
    Ok(SecretString::from(access_token))
}
