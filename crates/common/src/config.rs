use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Envelope (encrypted channel) constants
pub mod envelope {
    /// AEAD nonce size in bytes (96 bits)
    pub const NONCE_SIZE: usize = 12;

    /// Derived key size in bytes (256 bits)
    pub const KEY_SIZE: usize = 32;

    /// AEAD authentication tag size in bytes (128 bits)
    pub const AUTH_TAG_SIZE: usize = 16;

    /// Default zstd compression level for envelope payloads
    pub const ZSTD_LEVEL: i32 = 19;

    /// Fixed HKDF salt for envelope key derivation
    pub const HKDF_SALT: &[u8] = b"my-blog-easter-egg";

    /// Fixed HKDF context string for envelope key derivation
    pub const HKDF_INFO: &[u8] = b"blog-encryption";
}

/// Subscription fetch constants
pub mod fetch {
    /// Attempts per URL before giving up
    pub const MAX_ATTEMPTS: u32 = 2;

    /// Per-attempt timeout
    pub const ATTEMPT_TIMEOUT_SECS: u64 = 4;

    /// Delay between attempts
    pub const RETRY_DELAY_MS: u64 = 50;

    /// Timeout for favicon lookups
    pub const FAVICON_TIMEOUT_SECS: u64 = 5;
}

/// Routing config constants
pub mod routing {
    /// Resolver tag wired into every translated outbound
    pub const DEFAULT_RESOLVER_TAG: &str = "dns_local";

    /// Selector groups that must exist in the base template
    pub const REQUIRED_SELECTOR_GROUPS: [&str; 3] = ["PROXY", "auto", "AI"];

    /// Regions that get their own selector group
    pub const DEFAULT_REGION_ALLOW_LIST: [&str; 3] = ["\u{1F1ED}\u{1F1F0}", "\u{1F1FA}\u{1F1F8}", "\u{1F1EF}\u{1F1F5}"];
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address
    pub listen_addr: String,

    /// Listen port
    pub listen_port: u16,

    /// Shared secret for envelope encryption and hidden authentication.
    /// Injected by the binary (ENCRYPTION_PASSWORD); never read from the
    /// environment inside the core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Resolver tag applied to translated outbounds
    pub resolver_tag: String,

    /// Optional path to a base routing template overriding the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_string(),
            listen_port: 3000,
            secret: None,
            resolver_tag: routing::DEFAULT_RESOLVER_TAG.to_string(),
            template_path: None,
            verbose: false,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_resolver_tag(mut self, tag: impl Into<String>) -> Self {
        self.resolver_tag = tag.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),
}
