//! TOML configuration file.
//!
//! Location: `<config dir>/guess-duel/config.toml` (e.g. `~/.config` on
//! Linux, `~/Library/Application Support` on macOS). Every field has a
//! default, so a partial file or no file at all is fine.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{
    DEFAULT_HIGH, DEFAULT_LOW, DEFAULT_MAX_RESAMPLE_ATTEMPTS, GuessBounds, SessionOptions,
};

/// Default tracing directive.
pub const DEFAULT_LOG_LEVEL: &str = "guess_duel=info";

// ============================================================================
// SCHEMA
// ============================================================================

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameSection,
    pub log: LogSection,
}

/// `[game]`: range and guesser behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Smallest secret.
    pub low: u32,
    /// Exclusive upper end of the range.
    pub high: u32,
    pub max_resample_attempts: u32,
    /// Reject hints that contradict the secret ("Don't lie!").
    pub honesty_check: bool,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
            max_resample_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
            honesty_check: true,
        }
    }
}

/// `[log]`: tracing filter and optional log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
    /// The TUI only logs when this is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn bounds(&self) -> GuessBounds {
        GuessBounds {
            low: self.game.low,
            high: self.game.high,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_resample_attempts: self.game.max_resample_attempts,
            honesty_check: self.game.honesty_check,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    /// The platform has no config directory.
    NoConfigDir,
    /// Reading or writing the file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The file is not valid TOML for this schema.
    Parse { path: PathBuf, message: String },
    /// Parsed fine, but the values make no sense.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path.display(), message)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Platform default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("guess-duel").join("config.toml"))
}

/// Load an explicit path, or the default path if it exists, else defaults.
///
/// An explicit path that does not exist is an error.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_from_path(p),
        None => {
            let default = default_config_path()?;
            if default.exists() {
                load_from_path(&default)
            } else {
                debug!("no config at {}, using defaults", default.display());
                Ok(Config::default())
            }
        }
    }
}

/// Parse and validate a config file.
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    validate(&config)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a config (no validation).
pub fn parse(content: &str) -> Result<Config, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Check cross-field constraints serde cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.bounds().is_valid() {
        return Err(ConfigError::Invalid(format!(
            "game range [{}, {}) needs low >= 1 and at least two numbers",
            config.game.low, config.game.high
        )));
    }
    if config.game.max_resample_attempts == 0 {
        return Err(ConfigError::Invalid(
            "max_resample_attempts must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Write the current config to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn create_default_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        return Err(io_err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    std::fs::write(path, to_toml(config)).map_err(io_err)?;
    info!("created config at {}", path.display());
    Ok(())
}

/// Render a config as TOML text.
pub fn to_toml(config: &Config) -> String {
    toml::to_string_pretty(config)
        .unwrap_or_else(|e| format!("# failed to serialize config: {}\n", e))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bounds(), GuessBounds::default());
        assert!(config.session_options().honesty_check);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse("[game]\nhonesty_check = false\n").unwrap();
        assert!(!config.game.honesty_check);
        assert_eq!(config.game.low, DEFAULT_LOW);
        assert_eq!(config.game.high, DEFAULT_HIGH);
        assert_eq!(config.log.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[game\nlow = ").unwrap();

        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn collapsed_range_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[game]\nlow = 10\nhigh = 11\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("[10, 11)"));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let mut config = Config::default();
        config.game.max_resample_attempts = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn created_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.game.high = 1000;
        config.log.file = Some(PathBuf::from("/tmp/guess-duel.log"));

        create_default_config(&path, &config).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert!(create_default_config(&path, &Config::default()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
