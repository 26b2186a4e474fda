//! Configuration and settings management
//!
//! Loads relay settings from configuration files and the environment, and
//! the static route table from a JSON file.

use crate::types::{ChatRef, Route, RouteTable};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default path of the route file.
pub const DEFAULT_ROUTES_PATH: &str = "chats.json";
/// Attempts per destination before giving up.
pub const RELAY_SEND_MAX_ATTEMPTS: usize = 3;
/// Fixed delay (milliseconds) after each failed send attempt.
pub const RELAY_SEND_RETRY_DELAY_MS: u64 = 500;
/// Caption used for media relayed without text.
pub const MEDIA_PLACEHOLDER_CAPTION: &str = "Media attached.";

/// Relay settings loaded from configuration files and environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RelaySettings {
    /// Path of the JSON route file
    #[serde(default = "default_routes_path")]
    pub routes_path: String,
    /// Attempts per destination
    #[serde(default = "default_send_max_attempts")]
    pub send_max_attempts: usize,
    /// Delay after a failed attempt, in milliseconds
    #[serde(default = "default_send_retry_delay_ms")]
    pub send_retry_delay_ms: u64,
    /// Caption for media relayed without text
    #[serde(default = "default_media_placeholder_caption")]
    pub media_placeholder_caption: String,
}

fn default_routes_path() -> String {
    DEFAULT_ROUTES_PATH.to_string()
}

const fn default_send_max_attempts() -> usize {
    RELAY_SEND_MAX_ATTEMPTS
}

const fn default_send_retry_delay_ms() -> u64 {
    RELAY_SEND_RETRY_DELAY_MS
}

fn default_media_placeholder_caption() -> String {
    MEDIA_PLACEHOLDER_CAPTION.to_string()
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            routes_path: default_routes_path(),
            send_max_attempts: default_send_max_attempts(),
            send_retry_delay_ms: default_send_retry_delay_ms(),
            media_placeholder_caption: default_media_placeholder_caption(),
        }
    }
}

/// Build the layered configuration shared by all settings structs.
///
/// Sources, later ones overriding earlier ones: `config/default`,
/// `config/{RUN_MODE}`, `config/local`, `APP__`-prefixed environment, and the
/// plain environment with empty values ignored.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg. `APP__SEND_MAX_ATTEMPTS=5`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps to snake_case keys
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl RelaySettings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }
}

/// Errors raised while loading the route file
#[derive(Error, Debug)]
pub enum RouteConfigError {
    /// The file could not be read
    #[error("Failed to read route file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid route JSON
    #[error("Invalid route JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A chat identifier is not an integer
    #[error("Invalid chat id: {0:?}")]
    InvalidChatId(String),
}

/// Chat identifier as written in the route file: a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChatId {
    Number(i64),
    Text(String),
}

impl RawChatId {
    fn normalize(self) -> Result<ChatRef, RouteConfigError> {
        match self {
            Self::Number(id) => Ok(ChatRef(id)),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(ChatRef)
                .map_err(|_| RouteConfigError::InvalidChatId(text)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    source: RawChatId,
    #[serde(default)]
    destination: Vec<RawChatId>,
}

/// Parse a route table from JSON text.
///
/// The format is `[{"source": id, "destination": [id, ...]}, ...]`.
///
/// # Errors
///
/// Returns `RouteConfigError` on malformed JSON or non-numeric chat ids.
pub fn parse_routes(json: &str) -> Result<RouteTable, RouteConfigError> {
    let raw: Vec<RawRoute> = serde_json::from_str(json)?;
    let mut routes = Vec::with_capacity(raw.len());

    for entry in raw {
        let source = entry.source.normalize()?;
        let destinations = entry
            .destination
            .into_iter()
            .map(RawChatId::normalize)
            .collect::<Result<Vec<_>, _>>()?;
        if destinations.is_empty() {
            warn!(source = %source, "Route has no destinations");
        }
        routes.push(Route {
            source,
            destinations,
        });
    }

    Ok(RouteTable::new(routes))
}

/// Load the route table from a JSON file.
///
/// # Errors
///
/// Returns `RouteConfigError` if the file cannot be read or parsed.
pub fn load_routes(path: impl AsRef<Path>) -> Result<RouteTable, RouteConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let table = parse_routes(&json)?;
    info!(
        "Loaded {} route(s) from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_id_forms() {
        let table = parse_routes(
            r#"[
                {"source": -1001, "destination": [200, "-300"]},
                {"source": "-1001", "destination": [" 400 "]}
            ]"#,
        )
        .expect("valid routes");

        assert_eq!(table.len(), 2);
        let dests: Vec<ChatRef> = table.destinations_for(ChatRef(-1001)).collect();
        assert_eq!(dests, vec![ChatRef(200), ChatRef(-300), ChatRef(400)]);
    }

    #[test]
    fn test_missing_destination_is_empty() {
        let table = parse_routes(r#"[{"source": 1}]"#).expect("valid routes");
        assert_eq!(table.routes()[0].destinations, Vec::<ChatRef>::new());
    }

    #[test]
    fn test_invalid_chat_id() {
        let err = parse_routes(r#"[{"source": "general", "destination": []}]"#)
            .expect_err("non-numeric id must fail");
        assert!(matches!(err, RouteConfigError::InvalidChatId(ref id) if id == "general"));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_routes(r#"{"source": 1}"#).expect_err("object is not a route list");
        assert!(matches!(err, RouteConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_routes("definitely/not/here.json").expect_err("missing file");
        assert!(matches!(err, RouteConfigError::Io(_)));
    }

    #[test]
    fn test_default_settings() {
        let settings = RelaySettings::default();
        assert_eq!(settings.routes_path, "chats.json");
        assert_eq!(settings.send_max_attempts, 3);
        assert_eq!(settings.send_retry_delay_ms, 500);
        assert_eq!(settings.media_placeholder_caption, "Media attached.");
    }
}
