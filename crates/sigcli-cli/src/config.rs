use serde::{Deserialize, Serialize};
use sigcli_sdk::CliBuilder;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SIGCLI_CONFIG";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Config IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Invalid config file: {}", err),
            ConfigError::Serialize(err) => write!(f, "Could not serialize config: {}", err),
            ConfigError::NoConfigDir => write!(
                f,
                "Could not determine config path: set {} or a platform config directory",
                CONFIG_ENV
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            ConfigError::NoConfigDir => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}

/// Resolve the config file path based on priority:
/// 1. Explicit path
/// 2. SIGCLI_CONFIG environment variable
/// 3. `<platform config dir>/sigcli/config.toml`
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(env_path));
    }

    dirs::config_dir()
        .map(|dir| dir.join("sigcli").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// How a non-None entrypoint result is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submodules: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negatable_bools: Option<bool>,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path(None)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override the builder's settings with the ones present in the file.
    pub fn apply(&self, mut builder: CliBuilder) -> CliBuilder {
        if let Some(submodules) = self.submodules {
            builder = builder.submodules(submodules);
        }
        if let Some(negatable) = self.negatable_bools {
            builder = builder.negatable_bools(negatable);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.output, OutputFormat::Plain);
        assert!(config.submodules.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            submodules: Some(false),
            negatable_bools: None,
            output: OutputFormat::Json,
            log_level: Some("debug".to_string()),
        };
        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "output = \"json\"\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.negatable_bools.is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "output = \"yaml\"\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/tmp/explicit.toml"))?;
        assert_eq!(path, PathBuf::from("/tmp/explicit.toml"));
        Ok(())
    }

    #[test]
    fn test_apply_overrides_builder() {
        let config = Config {
            submodules: Some(true),
            negatable_bools: Some(false),
            ..Config::default()
        };
        let options = config.apply(CliBuilder::new()).options().clone();
        assert!(options.submodules);
        assert!(!options.negatable_bools);

        let untouched = Config::default().apply(CliBuilder::new().submodules(true));
        assert!(untouched.options().submodules);
        assert!(untouched.options().negatable_bools);
    }
}
