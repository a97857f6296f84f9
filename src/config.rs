//! # Configuration Management
//!
//! Centralized configuration for the query protocol core.
//!
//! This module holds the wire constants of the protocol and the tunable limits
//! applied while decoding datagrams and reassembling split messages, plus the
//! logging settings consumed by [`init_logging`](crate::utils::logging::init_logging).
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Security Considerations
//! - Datagram size is capped (1400 bytes by default) before any parsing
//! - Fragment count and reassembled size are bounded to stop memory exhaustion

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Prefix of every single-datagram packet
pub const PACKET_PREFIX: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Prefix of a datagram carrying one fragment of a split message
pub const SPLIT_PACKET_PREFIX: [u8; 4] = [0xFE, 0xFF, 0xFF, 0xFF];

/// Header value (as little-endian i32) marking a split datagram
pub const PACKET_SPLIT_MARKER: i32 = -2;

/// Default maximum size of a single datagram
pub const PACKET_SIZE: usize = 1400;

/// Size of prefix plus type tag
pub const HEADER_SIZE: usize = PACKET_PREFIX.len() + 1;

/// Compressed messages declare their size as a u16
pub const MAX_UNCOMPRESSED_SIZE: usize = u16::MAX as usize;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct QueryConfig {
    /// Datagram codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Split-packet reassembly configuration
    #[serde(default)]
    pub reassembly: ReassemblyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QueryConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("STEAM_QUERY_MAX_DATAGRAM_SIZE") {
            config.codec.max_datagram_size = size.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid STEAM_QUERY_MAX_DATAGRAM_SIZE: {e}"))
            })?;
        }

        if let Ok(count) = std::env::var("STEAM_QUERY_MAX_FRAGMENTS") {
            config.reassembly.max_fragments = count.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid STEAM_QUERY_MAX_FRAGMENTS: {e}"))
            })?;
        }

        if let Ok(size) = std::env::var("STEAM_QUERY_MAX_MESSAGE_SIZE") {
            config.reassembly.max_message_size = size.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid STEAM_QUERY_MAX_MESSAGE_SIZE: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("STEAM_QUERY_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid STEAM_QUERY_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.reassembly.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Datagram codec configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Largest datagram the codec accepts, prefix included
    pub max_datagram_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_datagram_size: PACKET_SIZE,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_datagram_size < HEADER_SIZE {
            errors.push(format!(
                "Max datagram size too small: {} (minimum: {HEADER_SIZE})",
                self.max_datagram_size
            ));
        } else if self.max_datagram_size > 65_507 {
            errors.push(format!(
                "Max datagram size exceeds UDP payload limit: {} (maximum: 65507)",
                self.max_datagram_size
            ));
        }

        errors
    }
}

/// Split-packet reassembly configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReassemblyConfig {
    /// Maximum number of fragments accepted for a single message
    pub max_fragments: usize,

    /// Maximum size of the concatenated fragment bytes
    pub max_message_size: usize,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            // The split header stores the fragment count in a single byte
            max_fragments: 255,
            max_message_size: 255 * PACKET_SIZE,
        }
    }
}

impl ReassemblyConfig {
    /// Validate reassembly configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_fragments == 0 {
            errors.push("Max fragments must be greater than 0".to_string());
        } else if self.max_fragments > u16::MAX as usize {
            errors.push(format!(
                "Max fragments too large: {} (maximum: 65535)",
                self.max_fragments
            ));
        }

        if self.max_message_size == 0 {
            errors.push("Max message size cannot be 0".to_string());
        } else if self.max_message_size > 16 * 1024 * 1024 {
            errors.push(format!(
                "Max message size too large: {} bytes (maximum recommended: 16 MB)",
                self.max_message_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
