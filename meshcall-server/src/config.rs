//! Relay server configuration.
//!
//! Configuration is loaded from environment variables. Inline room secrets
//! are redacted in Debug output.

use crate::auth::{DelegationPolicy, InMemorySecretStore};
use meshcall_core::{IceServerConfig, RoomId};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

pub const DEFAULT_DELEGATED_SECRET_TTL_SECS: u64 = 300;

/// Upper bound for `MESHCALL_DELEGATED_SECRET_TTL_SECS` (one day).
pub const MAX_DELEGATED_SECRET_TTL_SECS: u64 = 86_400;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_ICE_SERVER: &str = "stun:stun.l.google.com:19302";

pub const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct Config {
    pub port: u16,

    pub bind_host: String,

    /// JSON file of `{"<room>": "<secret>"}` (optional).
    pub room_secrets_file: Option<PathBuf>,

    /// Inline `room=secret` pairs. Never printed.
    pub room_secrets: Vec<(RoomId, String)>,

    pub delegated_secret_ttl_secs: u64,

    pub sweep_interval_secs: u64,

    pub bind_delegated_to_endpoint: bool,

    pub ice_servers: Vec<IceServerConfig>,

    pub command_channel_capacity: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rooms: Vec<&str> = self
            .room_secrets
            .iter()
            .map(|(room_id, _)| room_id.as_str())
            .collect();

        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_host", &self.bind_host)
            .field("room_secrets_file", &self.room_secrets_file)
            .field("room_secrets", &format!("[REDACTED] for {rooms:?}"))
            .field("delegated_secret_ttl_secs", &self.delegated_secret_ttl_secs)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field(
                "bind_delegated_to_endpoint",
                &self.bind_delegated_to_endpoint,
            )
            .field("ice_servers", &self.ice_servers)
            .field("command_channel_capacity", &self.command_channel_capacity)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to load room secrets: {0}")]
    SecretStore(#[from] crate::auth::StoreError),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(vars, "PORT", DEFAULT_PORT)?;

        let bind_host = vars
            .get("MESHCALL_BIND_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let room_secrets_file = vars
            .get("MESHCALL_ROOM_SECRETS_FILE")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let room_secrets = match vars.get("MESHCALL_ROOM_SECRETS") {
            Some(raw) => parse_room_secrets(raw)?,
            None => Vec::new(),
        };

        let delegated_secret_ttl_secs = parse_or(
            vars,
            "MESHCALL_DELEGATED_SECRET_TTL_SECS",
            DEFAULT_DELEGATED_SECRET_TTL_SECS,
        )?;
        if delegated_secret_ttl_secs > MAX_DELEGATED_SECRET_TTL_SECS {
            return Err(ConfigError::InvalidValue(format!(
                "MESHCALL_DELEGATED_SECRET_TTL_SECS must be at most {}",
                MAX_DELEGATED_SECRET_TTL_SECS
            )));
        }

        let sweep_interval_secs = parse_or(
            vars,
            "MESHCALL_SWEEP_INTERVAL_SECS",
            DEFAULT_SWEEP_INTERVAL_SECS,
        )?;
        if sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "MESHCALL_SWEEP_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        let bind_delegated_to_endpoint =
            parse_or(vars, "MESHCALL_BIND_DELEGATED_TO_ENDPOINT", true)?;

        let ice_servers = parse_ice_servers(
            vars.get("MESHCALL_ICE_SERVERS")
                .map(String::as_str)
                .unwrap_or(DEFAULT_ICE_SERVER),
        );

        let command_channel_capacity = parse_or(
            vars,
            "MESHCALL_COMMAND_CHANNEL_CAPACITY",
            DEFAULT_COMMAND_CHANNEL_CAPACITY,
        )?;
        if command_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "MESHCALL_COMMAND_CHANNEL_CAPACITY must be positive".to_string(),
            ));
        }

        Ok(Config {
            port,
            bind_host,
            room_secrets_file,
            room_secrets,
            delegated_secret_ttl_secs,
            sweep_interval_secs,
            bind_delegated_to_endpoint,
            ice_servers,
            command_channel_capacity,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn delegation_policy(&self) -> DelegationPolicy {
        DelegationPolicy {
            ttl: Duration::from_secs(self.delegated_secret_ttl_secs),
            bind_to_endpoint: self.bind_delegated_to_endpoint,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Builds the durable store from the secrets file, then the inline pairs.
    /// Inline pairs win on conflict.
    pub fn secret_store(&self) -> Result<InMemorySecretStore, ConfigError> {
        let store = match &self.room_secrets_file {
            Some(path) => InMemorySecretStore::load_json_file(path)?,
            None => InMemorySecretStore::new(),
        };
        for (room_id, secret) in &self.room_secrets {
            store.insert(room_id.clone(), secret.clone());
        }
        Ok(store)
    }
}

fn parse_or<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{key}={raw}"))),
        None => Ok(default),
    }
}

fn parse_room_secrets(raw: &str) -> Result<Vec<(RoomId, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((room, secret)) if !room.is_empty() && !secret.is_empty() => {
                Ok((RoomId::from(room), secret.to_string()))
            }
            _ => Err(ConfigError::InvalidValue(
                "MESHCALL_ROOM_SECRETS entries must be room=secret".to_string(),
            )),
        })
        .collect()
}

fn parse_ice_servers(raw: &str) -> Vec<IceServerConfig> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| IceServerConfig {
            urls: vec![url.to_string()],
            username: None,
            credential: None,
        })
        .collect()
}
