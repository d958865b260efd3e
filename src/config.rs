//! Museion configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Museion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuseionConfig {
    /// HTTP API configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Durable storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// AI curator configuration
    #[serde(default)]
    pub curator: CuratorConfig,

    /// Staff editor configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Ticket prices used by the booking flow
    #[serde(default)]
    pub tickets: TicketPrices,
}

impl MuseionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Durable storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one snapshot file per collection
    pub data_dir: PathBuf,

    /// Advisory quota in bytes shown next to the usage estimate
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            quota_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Default data directory (~/.museion/data/)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".museion")
        .join("data")
}

/// AI curator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Enable the curator chat
    pub enabled: bool,

    /// API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// System instruction sent with every request
    pub system_prompt: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "MUSEION_CURATOR_API_KEY".to_string(),
            system_prompt: "You are the museum's AI Curator. Answer visitor questions about \
                the exhibitions, the collection and visiting hours in a warm, concise tone."
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl CuratorConfig {
    /// Resolve the API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Staff editor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared password unlocking staff mode. Not a security boundary.
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "curator".to_string(),
        }
    }
}

/// Ticket prices per class in integer currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPrices {
    pub adult: u64,
    pub student: u64,
    pub child: u64,
}

impl Default for TicketPrices {
    fn default() -> Self {
        Self {
            adult: 500,
            student: 250,
            child: 0,
        }
    }
}
