//! Configuration management for dia.
//!
//! Loads configuration from ${DIA_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Backend provider used when creating new sessions.
///
/// The analyzer backend can answer with a hosted Groq model or a local
/// GGUF model; the choice is fixed per session at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted Groq model (backend default)
    #[default]
    Groq,
    /// Local GGUF model loaded by the backend
    Local,
}

impl ProviderKind {
    /// Returns the wire identifier sent to the backend.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Local => "local",
        }
    }

    /// Returns a human-readable label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "Groq (hosted)",
            ProviderKind::Local => "Local (GGUF)",
        }
    }

    /// Parses a wire identifier back into a provider kind.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "groq" => Some(ProviderKind::Groq),
            "local" => Some(ProviderKind::Local),
            _ => None,
        }
    }

    /// Returns all provider kinds for iteration (e.g., in picker).
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::Groq, ProviderKind::Local]
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
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
    //! Path resolution for dia configuration and data directories.
    //!
    //! DIA_HOME resolution order:
    //! 1. DIA_HOME environment variable (if set)
    //! 2. ~/.config/dia (default)

    use std::path::PathBuf;

    /// Returns the dia home directory.
    ///
    /// Checks DIA_HOME env var first, falls back to ~/.config/dia
    pub fn dia_home() -> PathBuf {
        if let Ok(home) = std::env::var("DIA_HOME") {
            return PathBuf::from(home);
        }

        home_dir()
            .map(|h| h.join(".config").join("dia"))
            .expect("Could not determine home directory")
    }

    /// Returns the user's home directory.
    pub fn home_dir() -> Option<PathBuf> {
        std::env::home_dir()
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        dia_home().join("config.toml")
    }

    /// Returns the directory for rolling log files.
    pub fn logs_dir() -> PathBuf {
        dia_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analyzer backend
    pub base_url: String,

    /// Provider used when creating new sessions
    pub provider: ProviderKind,

    /// Name given to sessions the client creates automatically
    pub session_name: String,

    /// Log filter for the rolling file log (RUST_LOG syntax)
    pub log_filter: String,
}

impl Config {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
    pub const DEFAULT_SESSION_NAME: &str = "New Session";
    const DEFAULT_LOG_FILTER: &str = "dia=info";

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

    /// Saves only the provider field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_provider(provider: ProviderKind) -> Result<()> {
        Self::save_provider_to(&paths::config_path(), provider)
    }

    /// Saves only the provider field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_provider_to(path: &Path, provider: ProviderKind) -> Result<()> {
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

        doc["provider"] = value(provider.id());

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
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

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            provider: ProviderKind::default(),
            session_name: Self::DEFAULT_SESSION_NAME.to_string(),
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// load_from: returns defaults when the file is missing.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.base_url, Config::DEFAULT_BASE_URL);
        assert_eq!(config.provider, ProviderKind::Groq);
        assert_eq!(config.session_name, "New Session");
    }

    /// load_from: partial files keep defaults for missing fields.
    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "provider = \"local\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider, ProviderKind::Local);
        assert_eq!(config.base_url, Config::DEFAULT_BASE_URL);
    }

    /// load_from: malformed TOML is an error, not silently defaulted.
    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "provider = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    /// save_provider_to: creates the file from the template when missing.
    #[test]
    fn test_save_provider_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::save_provider_to(&path, ProviderKind::Local).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("provider = \"local\""));
        // Template comments survive the write
        assert!(contents.contains("# dia configuration"));
    }

    /// save_provider_to: preserves user values for other fields.
    #[test]
    fn test_save_provider_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"http://analyzer:9000\"\n").unwrap();

        Config::save_provider_to(&path, ProviderKind::Local).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://analyzer:9000");
        assert_eq!(config.provider, ProviderKind::Local);
    }

    /// init: refuses to overwrite an existing config.
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# existing").unwrap();

        assert!(Config::init(&path).is_err());
    }

    /// ProviderKind round-trips through its wire identifier.
    #[test]
    fn test_provider_kind_ids() {
        for kind in ProviderKind::all() {
            assert_eq!(ProviderKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(ProviderKind::from_id("openai"), None);
    }

    /// The embedded template parses into a valid default config.
    #[test]
    fn test_template_matches_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.provider, defaults.provider);
        assert_eq!(config.session_name, defaults.session_name);
        assert_eq!(config.log_filter, defaults.log_filter);
    }
}
