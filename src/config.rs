use crate::ai_provider::AiProvider;
use crate::error::{Result, SwiftClaimError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AI CLI used for classification
    pub provider: AiProvider,
    /// Hard deadline for one classifier invocation
    pub timeout_seconds: u64,
    /// Receipt images larger than this are downscaled before storage
    pub max_image_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: AiProvider::Claude,
            timeout_seconds: 120,
            max_image_size: 1568,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SwiftClaimError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("swiftclaim").join("config.json"))
    }

    pub fn set_provider(&mut self, provider: AiProvider) -> Result<()> {
        self.provider = provider;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(SwiftClaimError::Config("timeout must be at least 1 second".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider, AiProvider::Claude);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.max_image_size, 1568);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            provider: AiProvider::Gemini,
            timeout_seconds: 30,
            max_image_size: 800,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.provider, AiProvider::Gemini);
        assert_eq!(back.timeout_seconds, 30);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_seconds": 10}"#).unwrap();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.provider, AiProvider::Claude);
    }
}
