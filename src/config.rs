use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub granola: GranolaConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Overrides for where the Granola desktop app keeps its files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GranolaConfig {
    pub cache_path: Option<PathBuf>,
    pub credentials_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub default_limit: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { default_limit: Some(20) }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "granola-cli", "granola")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.output.default_limit, Some(20));
        assert!(config.granola.cache_path.is_none());
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.granola.cache_path = Some(PathBuf::from("/tmp/cache-v3.json"));
        config.output.default_limit = Some(5);

        let serialized = toml::to_string_pretty(&config)?;
        let parsed: Config = toml::from_str(&serialized)?;
        assert_eq!(parsed.granola.cache_path, Some(PathBuf::from("/tmp/cache-v3.json")));
        assert_eq!(parsed.output.default_limit, Some(5));
        Ok(())
    }

    #[test]
    fn test_missing_sections_use_defaults() -> Result<()> {
        let parsed: Config = toml::from_str("")?;
        assert_eq!(parsed.output.default_limit, Some(20));
        Ok(())
    }
}
