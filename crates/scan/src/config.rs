//! Wallet configuration loader.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENV_ORIGIN: &str = "LAWALLET_ORIGIN";
pub const ENV_GATEWAY: &str = "LAWALLET_GATEWAY";
pub const ENV_LIGHTNING_DOMAIN: &str = "LAWALLET_LIGHTNING_DOMAIN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Public keys of the wallet's backend modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePubkeys {
    pub card: String,
}

/// Read-only wallet settings shared by the scanner and the badge flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Origin the wallet app is served from.
    pub origin: String,
    /// Federation domain for lightning addresses and nip05 identifiers.
    pub lightning_domain: String,
    /// Reserved origin of the claim-badge service.
    pub claim_badge_origin: String,
    /// Gateway used to query and publish events.
    pub gateway: String,
    pub module_pubkeys: ModulePubkeys,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl WalletConfig {
    /// Load, apply environment overrides and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(ConfigError::Invalid("config file is empty".to_string()));
        }

        let mut config: WalletConfig = serde_yaml::from_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.normalize();
        config.validate()?;

        tracing::info!("Loaded wallet config for {}", config.origin);
        Ok(config)
    }

    /// Override fields from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin = origin;
        }
        if let Some(gateway) = lookup(ENV_GATEWAY) {
            self.gateway = gateway;
        }
        if let Some(domain) = lookup(ENV_LIGHTNING_DOMAIN) {
            self.lightning_domain = domain;
        }
    }

    fn normalize(&mut self) {
        for field in [&mut self.origin, &mut self.claim_badge_origin, &mut self.gateway] {
            *field = field.trim().trim_end_matches('/').to_string();
        }
        self.lightning_domain = self.lightning_domain.trim().to_lowercase();
        self.module_pubkeys.card = self.module_pubkeys.card.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("origin", &self.origin),
            ("claim_badge_origin", &self.claim_badge_origin),
            ("gateway", &self.gateway),
        ] {
            let url = Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL: {}",
                    name, value
                )));
            }
        }

        if self.lightning_domain.is_empty() {
            return Err(ConfigError::Invalid(
                "lightning_domain must not be empty".to_string(),
            ));
        }

        if !is_hex_key(&self.module_pubkeys.card) {
            return Err(ConfigError::Invalid(format!(
                "module_pubkeys.card is not a 64-character hex key: {}",
                self.module_pubkeys.card
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn is_hex_key(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CARD: &str = "18f6a706091b421bd9db1bac964030b3ca3dd2d5c4ac1e51a13fa7e86c6d0d55";

    fn yaml() -> String {
        format!(
            "origin: https://app.lawallet.ar/\n\
             lightning_domain: LaWallet.ar\n\
             claim_badge_origin: https://badges.lawallet.ar\n\
             gateway: https://api.lawallet.ar\n\
             module_pubkeys:\n  card: {}\n",
            CARD
        )
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lawallet.yaml");
        fs::write(&path, yaml()).unwrap();

        let config = WalletConfig::load(&path).unwrap();
        assert_eq!(config.origin, "https://app.lawallet.ar");
        assert_eq!(config.lightning_domain, "lawallet.ar");
        assert_eq!(config.module_pubkeys.card, CARD);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_missing_file() {
        let result = WalletConfig::load("/nonexistent/lawallet.yaml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lawallet.yaml");
        fs::write(&path, "  \n").unwrap();
        assert!(matches!(WalletConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lawallet.yaml");
        fs::write(&path, "origin: [unclosed").unwrap();
        assert!(matches!(WalletConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_short_card_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lawallet.yaml");
        fs::write(&path, yaml().replace(CARD, "abc")).unwrap();
        assert!(matches!(WalletConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let mut config: WalletConfig = serde_yaml::from_str(&yaml()).unwrap();
        config.origin = "ftp://app.lawallet.ar".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config: WalletConfig = serde_yaml::from_str(&yaml()).unwrap();
        config.apply_overrides(|key| match key {
            ENV_ORIGIN => Some("http://localhost:3000".to_string()),
            _ => None,
        });
        assert_eq!(config.origin, "http://localhost:3000");
        assert_eq!(config.gateway, "https://api.lawallet.ar");
    }
}
