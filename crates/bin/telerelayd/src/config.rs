//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `telerelay.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use telerelay_adapter_mqtt::MqttConfig;
use telerelay_app::subscriber_hub::DEFAULT_LISTENER_CAPACITY;
use telerelay_domain::error::RegistryError;
use telerelay_domain::registry::{ChannelRegistry, TopicTable};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// MQTT broker connection.
    pub mqtt: MqttConfig,
    /// Relay tuning.
    pub relay: RelayConfig,
    /// Broker topic of every channel.
    pub topics: TopicTable,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Relay configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Updates queued per live listener before it is disconnected.
    pub listener_capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `telerelay.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("telerelay.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TELERELAY_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("TELERELAY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("TELERELAY_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("TELERELAY_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("TELERELAY_MQTT_PORT") {
            if let Ok(port) = val.parse() {
                self.mqtt.broker_port = port;
            }
        }
        if let Ok(val) = std::env::var("TELERELAY_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt broker_port must be non-zero".to_string(),
            ));
        }
        if self.relay.listener_capacity == 0 {
            return Err(ConfigError::Validation(
                "relay listener_capacity must be non-zero".to_string(),
            ));
        }
        self.registry()?;
        Ok(())
    }

    /// Build the channel registry from the configured topics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Topics`] if two channels share a topic or a
    /// topic is blank.
    pub fn registry(&self) -> Result<ChannelRegistry, ConfigError> {
        ChannelRegistry::new(self.topics.clone()).map_err(ConfigError::Topics)
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listener_capacity: DEFAULT_LISTENER_CAPACITY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "telerelayd=info,telerelay=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The topic table does not form a valid registry.
    #[error("invalid topic table")]
    Topics(#[source] RegistryError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
