//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/ticklist/config.toml)
//! 3. Environment variables (TICKLIST_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::validate_key;
use crate::theme::ColorScheme;

/// Environment variable prefix
const ENV_PREFIX: &str = "TICKLIST";

/// Key the working set is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "ToDoApp";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for stored values
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the working set is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Light or dark rendering
    #[serde(default)]
    pub color_scheme: ColorScheme,

    /// Merge the bundled default todos on load
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,

    /// Log file (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            color_scheme: ColorScheme::default(),
            seed_defaults: default_seed_defaults(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (TICKLIST_DATA_DIR, TICKLIST_STORAGE_KEY, ...)
    /// 2. Config file (~/.config/ticklist/config.toml or TICKLIST_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // TICKLIST_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // TICKLIST_STORAGE_KEY
        if let Ok(val) = std::env::var(format!("{}_STORAGE_KEY", ENV_PREFIX)) {
            if !val.is_empty() {
                self.storage_key = val;
            }
        }

        // TICKLIST_COLOR_SCHEME
        if let Ok(val) = std::env::var(format!("{}_COLOR_SCHEME", ENV_PREFIX)) {
            self.color_scheme = val
                .parse()
                .with_context(|| format!("Invalid {}_COLOR_SCHEME", ENV_PREFIX))?;
        }

        // TICKLIST_SEED_DEFAULTS
        if let Ok(val) = std::env::var(format!("{}_SEED_DEFAULTS", ENV_PREFIX)) {
            self.seed_defaults = val.eq_ignore_ascii_case("true") || val == "1";
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_key(&self.storage_key).context("Invalid storage_key")?;
        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with TICKLIST_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ticklist")
            .join("config.toml")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ticklist")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_seed_defaults() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "TICKLIST_DATA_DIR",
        "TICKLIST_STORAGE_KEY",
        "TICKLIST_COLOR_SCHEME",
        "TICKLIST_SEED_DEFAULTS",
        "TICKLIST_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage_key, "ToDoApp");
        assert_eq!(config.color_scheme, ColorScheme::Light);
        assert!(config.seed_defaults);
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("ticklist"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TICKLIST_DATA_DIR", "/tmp/ticklist-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/ticklist-test"));
    }

    #[test]
    fn test_env_override_storage_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TICKLIST_STORAGE_KEY", "work");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.storage_key, "work");

        // Empty string keeps the current key
        env::set_var("TICKLIST_STORAGE_KEY", "");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.storage_key, "work");
    }

    #[test]
    fn test_env_override_color_scheme() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TICKLIST_COLOR_SCHEME", "dark");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.color_scheme, ColorScheme::Dark);

        env::set_var("TICKLIST_COLOR_SCHEME", "purple");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_seed_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TICKLIST_SEED_DEFAULTS", "false");
        config.apply_env_overrides().unwrap();
        assert!(!config.seed_defaults);

        env::set_var("TICKLIST_SEED_DEFAULTS", "1");
        config.apply_env_overrides().unwrap();
        assert!(config.seed_defaults);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/ticklist"),
            storage_key: "ToDoApp".to_string(),
            color_scheme: ColorScheme::Dark,
            seed_defaults: false,
            log_file: Some(PathBuf::from("/tmp/ticklist.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains(r#"color_scheme = "dark""#));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.color_scheme, config.color_scheme);
        assert_eq!(parsed.seed_defaults, config.seed_defaults);
        assert_eq!(parsed.log_file, config.log_file);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            storage_key = "groceries"
            color_scheme = "dark"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.storage_key, "groceries");
        assert_eq!(config.color_scheme, ColorScheme::Dark);
        assert!(config.seed_defaults);
    }

    #[test]
    fn test_load_rejects_invalid_storage_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        let result = Config::load_from_str(r#"storage_key = "../outside""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("TICKLIST_DATA_DIR", temp_dir.path().join("data"));

        let path = temp_dir.path().join("missing.toml");
        let config = Config::load_from_path(&path).unwrap();

        // Defaults, with the data dir created
        assert_eq!(config.storage_key, "ToDoApp");
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            color_scheme: ColorScheme::Dark,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.color_scheme, ColorScheme::Dark);
        assert_eq!(loaded.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_config_file_path_override() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("TICKLIST_CONFIG", "/etc/ticklist.toml");
        assert_eq!(
            Config::config_file_path(),
            PathBuf::from("/etc/ticklist.toml")
        );
    }
}
