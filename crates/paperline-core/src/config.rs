//! Configuration management for paperline.
//!
//! Loads configuration from ${PAPERLINE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::sound::SoundSettings;
use crate::source::CacheStrategy;
use crate::typewriter::TypewriterOptions;

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments/sections from the template stay present while the user's
/// values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for paperline configuration and data directories.
    //!
    //! `PAPERLINE_HOME` resolution order:
    //! 1. `PAPERLINE_HOME` environment variable (if set)
    //! 2. ~/.config/paperline (default)
    //! 3. ./.paperline when no home directory can be determined

    use std::path::PathBuf;

    pub fn paperline_home() -> PathBuf {
        if let Ok(home) = std::env::var("PAPERLINE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".paperline"),
            |h| h.join(".config").join("paperline"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        paperline_home().join("config.toml")
    }

    /// Returns the directory holding cached résumé documents.
    pub fn cache_dir() -> PathBuf {
        paperline_home().join("cache")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        paperline_home().join("logs")
    }
}

/// Cadence of one typewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypewriterConfig {
    pub type_speed_ms: u64,
    pub erase_speed_ms: u64,
}

impl TypewriterConfig {
    pub const TITLE: Self = Self {
        type_speed_ms: 150,
        erase_speed_ms: 80,
    };
    pub const CONTENT: Self = Self {
        type_speed_ms: 70,
        erase_speed_ms: 40,
    };

    pub fn options(&self, sound_enabled: bool) -> TypewriterOptions {
        TypewriterOptions {
            type_speed: Duration::from_millis(self.type_speed_ms),
            erase_speed: Duration::from_millis(self.erase_speed_ms),
            sound_enabled,
        }
    }
}

/// A `[title]`/`[content]` table as written; missing keys keep the
/// section's own defaults.
#[derive(Deserialize)]
struct TypewriterSection {
    type_speed_ms: Option<u64>,
    erase_speed_ms: Option<u64>,
}

impl TypewriterSection {
    fn over(self, base: TypewriterConfig) -> TypewriterConfig {
        TypewriterConfig {
            type_speed_ms: self.type_speed_ms.unwrap_or(base.type_speed_ms),
            erase_speed_ms: self.erase_speed_ms.unwrap_or(base.erase_speed_ms),
        }
    }
}

fn default_title() -> TypewriterConfig {
    TypewriterConfig::TITLE
}

fn default_content() -> TypewriterConfig {
    TypewriterConfig::CONTENT
}

fn title_section<'de, D>(deserializer: D) -> Result<TypewriterConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TypewriterSection::deserialize(deserializer)?.over(TypewriterConfig::TITLE))
}

fn content_section<'de, D>(deserializer: D) -> Result<TypewriterConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TypewriterSection::deserialize(deserializer)?.over(TypewriterConfig::CONTENT))
}

/// Where the résumé document comes from and how it is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// URL (http/https) or file path.
    pub source: String,
    /// Local file tried when the source fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<PathBuf>,
    pub strategy: CacheStrategy,
    pub cache_key: String,
    pub cache_ttl_secs: u64,
}

impl DataConfig {
    const DEFAULT_SOURCE: &str = "resume-data.json";
    const DEFAULT_CACHE_KEY: &str = "resume-data-cache";
    const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: Self::DEFAULT_SOURCE.to_string(),
            fallback: None,
            strategy: CacheStrategy::default(),
            cache_key: Self::DEFAULT_CACHE_KEY.to_string(),
            cache_ttl_secs: Self::DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title line typewriter.
    #[serde(default = "default_title", deserialize_with = "title_section")]
    pub title: TypewriterConfig,

    /// Section content typewriter.
    #[serde(default = "default_content", deserialize_with = "content_section")]
    pub content: TypewriterConfig,

    pub sound: SoundSettings,

    pub data: DataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: TypewriterConfig::TITLE,
            content: TypewriterConfig::CONTENT,
            sound: SoundSettings::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Persists the `[sound]` section to the default config file.
    pub fn save_sound(settings: SoundSettings) -> Result<()> {
        Self::save_sound_to(&paths::config_path(), settings)
    }

    /// Persists the `[sound]` section, keeping every other value and comment.
    ///
    /// Creates the file from the template if it doesn't exist.
    pub fn save_sound_to(path: &Path, settings: SoundSettings) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["sound"]["enabled"] = value(settings.enabled);
        doc["sound"]["volume"] = value(f64::from(settings.volume));

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.title.type_speed_ms, 150);
        assert_eq!(config.content.erase_speed_ms, 40);
        assert_eq!(config.data.strategy, CacheStrategy::CacheFirst);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[content]\ntype_speed_ms = 5\n\n[data]\nstrategy = \"network-only\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();

        assert_eq!(config.content.type_speed_ms, 5);
        assert_eq!(config.title, TypewriterConfig::TITLE);
        assert_eq!(config.data.strategy, CacheStrategy::NetworkOnly);
        assert_eq!(config.data.cache_key, "resume-data-cache");
        assert!(config.sound.enabled);
    }

    #[test]
    fn test_partial_section_keeps_its_own_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[title]\ntype_speed_ms = 200\n\n[content]\ntype_speed_ms = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();

        assert_eq!(config.title.type_speed_ms, 200);
        assert_eq!(config.title.erase_speed_ms, 80);
        assert_eq!(config.content.type_speed_ms, 5);
        assert_eq!(config.content.erase_speed_ms, 40);
    }

    #[test]
    fn test_empty_section_uses_section_defaults() {
        let config: Config = toml::from_str("[title]\n[content]\n").unwrap();

        assert_eq!(config.title, TypewriterConfig::TITLE);
        assert_eq!(config.content, TypewriterConfig::CONTENT);
    }

    #[test]
    fn test_load_invalid_config_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[data]\nstrategy = \"sometimes\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "# existing").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_save_sound_preserves_other_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[title]\ntype_speed_ms = 9\n").unwrap();

        Config::save_sound_to(
            &config_path,
            SoundSettings {
                enabled: false,
                volume: 0.5,
            },
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert!(!config.sound.enabled);
        assert!((config.sound.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.title.type_speed_ms, 9);

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# Typing sounds"));
    }

    #[test]
    fn test_save_sound_creates_missing_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_sound_to(&config_path, SoundSettings::default()).unwrap();

        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_typewriter_config_options() {
        let options = TypewriterConfig::TITLE.options(false);
        assert_eq!(options.type_speed, Duration::from_millis(150));
        assert_eq!(options.erase_speed, Duration::from_millis(80));
        assert!(!options.sound_enabled);
    }
}
