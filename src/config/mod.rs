//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::normalize::PlayerAliases;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Notable VP collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotableConfig {
    /// Card names tracked as collections
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,

    /// Card that counts as notable from 1 VP instead of 3
    #[serde(default = "default_exception")]
    pub exception: String,

    /// How far below the batch max a card may be and still be notable
    #[serde(default = "default_window")]
    pub window: i32,
}

fn default_collections() -> Vec<String> {
    [
        "Stratospheric Birds",
        "Venusian Animals",
        "Ants",
        "Venusian Insects",
        "Penguins",
        "Birds",
        "Livestock",
        "Physics Complex",
        "Ecological Zone",
        "Pets",
        "Fish",
        "Immigration Shuttles",
        "Floating Habs",
        "Tardigrades",
        "Jovian Lanterns",
        "Io Mining Industries",
        "Ganymede Colony",
        "St. Joseph of Cupertino Mission",
        "Water Import From Europa",
        "Extremophiles",
        "Neptunian Power Consultants",
        "Asteroid Deflection System",
        "Decomposers",
        "Security Fleet",
        "Predators",
        "Commercial District",
        "Cloud Tourism",
        "Main Belt Asteroids",
        "Herbivores",
        "Small Animals",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exception() -> String {
    "Tardigrades".to_string()
}

fn default_window() -> i32 {
    5
}

impl Default for NotableConfig {
    fn default() -> Self {
        Self {
            collections: default_collections(),
            exception: default_exception(),
            window: default_window(),
        }
    }
}

/// Snapshot download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Largest accepted snapshot, in bytes
    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_content_size() -> usize {
    20 * 1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_content_size: default_max_content_size(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    /// Canonical player name -> known aliases
    #[serde(default = "default_players")]
    pub players: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub notable: NotableConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_players() -> BTreeMap<String, Vec<String>> {
    let roster: &[(&str, &[&str])] = &[
        (
            "Victor",
            &["Vic", "VicVic", "Victortor", "Yogurt", "notsuspicious", "Vanadium", "McVictor", "V"],
        ),
        ("Yota", &["Haircut", "flourer", "Yoyo", "y", "Yoter"]),
        ("Vy", &["Vyvy", "need bubs", "Vynus", "Vyter"]),
        ("Lindsey", &["LinLin", "Lin", "Lind", "Lithium", "McLindsey"]),
        ("Landon", &["Lando", "Lan", "LanLan", "Lanthanum", "L"]),
        ("Ming", &["need nap", "m"]),
        ("Amy", &["Americium", "A"]),
        ("Chris", &["Chras"]),
    ];

    roster
        .iter()
        .map(|(name, aliases)| {
            (
                name.to_string(),
                aliases.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            players: default_players(),
            notable: NotableConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Build the alias lookup for the configured roster.
    pub fn player_aliases(&self) -> Result<PlayerAliases, ConfigError> {
        PlayerAliases::new(&self.players).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Fetch timeout must be greater than 0".to_string(),
            ));
        }

        if self.notable.window < 0 {
            return Err(ConfigError::ValidationError(
                "Notable window must not be negative".to_string(),
            ));
        }

        self.player_aliases()?;

        Ok(())
    }
}
