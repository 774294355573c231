//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub extensions: ExtensionsConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// Extension autoload settings. The known-unit set itself is enumerated in
/// code; this only selects which units come up at start.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionsConfig {
    pub autoload: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetsConfig {
    /// Directory generated preview files are written to.
    pub output_dir: PathBuf,
    /// Timeout for asset downloads, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "glyph-bot".to_string(),
                prefix: "/".to_string(),
            },
            extensions: ExtensionsConfig {
                autoload: crate::cogs::known_units().iter().cloned().collect(),
            },
            assets: AssetsConfig {
                output_dir: PathBuf::from("./output"),
                download_timeout_secs: 30,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Build a config from environment variables, falling back to defaults.
    pub fn load_env() -> Self {
        let mut config = Self::default();
        if let Ok(prefix) = std::env::var("GLYPH_BOT_PREFIX") {
            config.bot.prefix = prefix;
        }
        if let Ok(dir) = std::env::var("GLYPH_BOT_OUTPUT_DIR") {
            config.assets.output_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.into(), content)
            .map_err(|e| ConfigError::Parse(format!("Failed to write config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_autoloads_every_known_unit() {
        let config = Config::default();
        assert_eq!(config.extensions.autoload.len(), crate::cogs::known_units().len());
    }

    #[test]
    fn roundtrips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, config.bot.prefix);
        assert_eq!(parsed.extensions.autoload, config.extensions.autoload);
    }
}
