//! Configuration loading for the API server.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Listener configuration for the API server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Address the server binds to.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// TCP port the server binds to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            listen_address: default_listen_address(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Parameters
    ///
    /// * `config_path` - Path to the config.toml file
    ///
    /// # Returns
    ///
    /// The parsed configuration, or an error if the file cannot be read
    /// or parsed.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            log::info!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// The socket address string to bind the listener to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_keys() {
        let config: ApiConfig = toml::from_str("").unwrap();
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn kebab_case_keys_are_parsed() {
        let config: ApiConfig = toml::from_str("listen-address = \"0.0.0.0\"\nport = 9000\n").unwrap();
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ApiConfig::load_or_default(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config.port, 8080);
    }
}
