use crate::transport::AddrFamily;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection and login settings for one instrument session.
///
/// Defaults match the instrument's factory remote-access account: user
/// `anonymous` with a single-space password, 10 second timeout, IPv4.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub addr_family: AddrFamily,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10001,
            username: "anonymous".to_string(),
            password: " ".to_string(),
            timeout_secs: 10,
            addr_family: AddrFamily::Ipv4,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load configuration with layered fallbacks: built-in defaults, then an
/// optional TOML file, then `OSA_*` environment variables.
pub fn load_config(config_path: Option<&Path>) -> Result<SessionConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&SessionConfig::default())?);

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    } else if Path::new("osa.toml").exists() {
        builder = builder.add_source(File::with_name("osa.toml"));
    }

    builder = builder.add_source(Environment::with_prefix("OSA"));

    builder.build()?.try_deserialize()
}
