use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::constants::{DEFAULT_ANIME_TAG, endpoints, limits};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub identification: IdentificationConfig,

    pub resolver: ResolverConfig,

    pub reorg: ReorgConfig,

    pub badges: BadgeConfig,
}

/// How series are recognized as anime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IdentificationMode {
    /// Genre list contains "Anime".
    #[default]
    Genre,
    /// Tag set contains the configured tag.
    Tag,
    /// Either of the above.
    GenreOrTag,
    /// Both of the above.
    GenreAndTag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    pub mode: IdentificationMode,

    /// Tag name checked by the tag-based modes (default: "Anime").
    pub tag: String,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            mode: IdentificationMode::default(),
            tag: DEFAULT_ANIME_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum delay between outbound requests in milliseconds
    /// (default: 2000). Values below the floor are raised to it.
    pub rate_limit_ms: u64,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    pub tvdb_base_url: String,

    pub anisearch_base_url: String,

    pub filler_list_base_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: limits::RATE_LIMIT_FLOOR_MS,
            request_timeout_seconds: limits::DEFAULT_REQUEST_TIMEOUT_SECS,
            tvdb_base_url: endpoints::TVDB_BASE.to_string(),
            anisearch_base_url: endpoints::ANISEARCH_BASE.to_string(),
            filler_list_base_url: endpoints::FILLER_LIST_BASE.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Effective inter-request delay with the floor applied.
    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        let ms = if self.rate_limit_ms > limits::RATE_LIMIT_FLOOR_MS {
            self.rate_limit_ms
        } else {
            limits::RATE_LIMIT_FLOOR_MS
        };
        Duration::from_millis(ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorgConfig {
    /// Request a non-destructive metadata refresh after a series was
    /// restructured (default: true).
    pub refresh_after_reorg: bool,

    /// Rename the remaining season after a merge (default: false).
    pub rename_single_season: bool,

    /// Name applied to season 1 when renaming is enabled.
    pub single_season_name: String,
}

impl Default for ReorgConfig {
    fn default() -> Self {
        Self {
            refresh_after_reorg: true,
            rename_single_season: false,
            single_season_name: "Episodes".to_string(),
        }
    }
}

/// Front-end badge toggles. Persisted alongside the engine settings but only
/// read by the host's episode-list script, never by the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub episode_badges: bool,

    pub season_list_badges: bool,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            episode_badges: true,
            season_list_badges: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Path::new("fillarr.toml");
        if path.exists() {
            info!("Loading config from: {}", path.display());
            return Self::load_from_path(path);
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let tag_mode = matches!(
            self.identification.mode,
            IdentificationMode::Tag
                | IdentificationMode::GenreOrTag
                | IdentificationMode::GenreAndTag
        );
        if tag_mode && self.identification.tag.trim().is_empty() {
            anyhow::bail!("Identification tag cannot be empty in a tag-based mode");
        }

        if self.reorg.rename_single_season && self.reorg.single_season_name.trim().is_empty() {
            anyhow::bail!("Single-season name cannot be empty when renaming is enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.identification.mode, IdentificationMode::Genre);
        assert_eq!(config.identification.tag, "Anime");
        assert_eq!(config.resolver.rate_limit_ms, 2000);
        assert!(config.reorg.refresh_after_reorg);
        assert!(!config.reorg.rename_single_season);
    }

    #[test]
    fn test_rate_limit_floor_is_enforced() {
        let config = ResolverConfig {
            rate_limit_ms: 100,
            ..ResolverConfig::default()
        };
        assert_eq!(config.request_delay(), Duration::from_millis(2000));

        let config = ResolverConfig {
            rate_limit_ms: 5000,
            ..ResolverConfig::default()
        };
        assert_eq!(config.request_delay(), Duration::from_millis(5000));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [identification]
            mode = "GenreOrTag"
            tag = "Animation"

            [resolver]
            rate_limit_ms = 3500
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.identification.mode, IdentificationMode::GenreOrTag);
        assert_eq!(config.identification.tag, "Animation");
        assert_eq!(config.resolver.rate_limit_ms, 3500);

        assert_eq!(config.resolver.tvdb_base_url, "https://www.thetvdb.com");
        assert!(config.reorg.refresh_after_reorg);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[identification]"));
        assert!(toml_str.contains("[resolver]"));
        assert!(toml_str.contains("[reorg]"));
    }

    #[test]
    fn test_validate_rejects_empty_tag_in_tag_mode() {
        let mut config = Config::default();
        config.identification.mode = IdentificationMode::Tag;
        config.identification.tag = String::new();
        assert!(config.validate().is_err());

        config.identification.mode = IdentificationMode::Genre;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_season_name_when_renaming() {
        let mut config = Config::default();
        config.reorg.rename_single_season = true;
        config.reorg.single_season_name = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
