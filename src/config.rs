//! Configuration loader for the `sensornode-relay` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase, and the core
//! derivations never see a hardcoded path, URL or threshold.
//!
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};

use crate::status::Thresholds;

/// Parse an optional environment variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Optional string variable with a default.
macro_rules! env_or {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| $default.to_string())
    };
}

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:1880/api/node2/cmd";

/// Names the store uses for each reading field.
///
/// The device flow that writes the store has used more than one name for the
/// light level over time, so every field is a mapping rather than a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub temperature: String,
    pub humidity: String,
    pub luminosity: String,
    pub sound: String,
    pub timestamp: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            temperature: "temperature".to_string(),
            humidity: "humidity".to_string(),
            luminosity: "luminosity".to_string(),
            sound: "sound".to_string(),
            timestamp: "timestamp".to_string(),
        }
    }
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Real-time store base URL.
    pub store_url: String,

    /// Credential passed through to the store as the `auth` query parameter.
    pub store_auth: Option<String>,

    /// Store path holding the latest reading.
    pub path_latest: String,

    /// Store path holding the keyed history.
    pub path_history: String,

    /// Upper bound for a single store read.
    pub store_timeout: Duration,

    /// Store field name mapping.
    pub fields: FieldNames,

    /// Command gateway endpoint.
    pub gateway_url: String,

    /// Upper bound for a single gateway exchange.
    pub gateway_timeout: Duration,

    /// Period of the background poll loop.
    pub refresh_interval: Duration,

    /// Maximum number of history points returned per cycle.
    pub history_limit: usize,

    /// Status classification thresholds.
    pub thresholds: Thresholds,

    /// Listen address of the relay API.
    pub bind_addr: SocketAddr,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `STORE_URL` – real-time store base URL
///
/// Optional:
/// - `STORE_AUTH` – store credential (default: none)
/// - `STORE_PATH_LATEST` / `STORE_PATH_HISTORY` (default: `node2/latest`, `node2/history`)
/// - `STORE_TIMEOUT_MS` (default: 5000)
/// - `STORE_FIELD_TEMPERATURE`, `STORE_FIELD_HUMIDITY`, `STORE_FIELD_LUMINOSITY`,
///   `STORE_FIELD_SOUND`, `STORE_FIELD_TIMESTAMP` (default: the display names)
/// - `GATEWAY_URL` (default: [`DEFAULT_GATEWAY_URL`])
/// - `GATEWAY_TIMEOUT_MS` (default: 5000)
/// - `REFRESH_INTERVAL_MS` (default: 2000)
/// - `HISTORY_LIMIT` (default: 200)
/// - `TEMP_HIGH`, `SOUND_HIGH`, `LUM_NIGHT` (default: 30.0, 2500, 1200)
/// - `BIND_ADDR` (default: `0.0.0.0:8080`)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_with(|name| env::var(name).ok())
}

/// Same as [`load_from_env`] but reads variables through `lookup`.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let store_url = require_env!(lookup, "STORE_URL");
    let store_auth = lookup("STORE_AUTH").filter(|v| !v.trim().is_empty());
    let path_latest = env_or!(lookup, "STORE_PATH_LATEST", "node2/latest");
    let path_history = env_or!(lookup, "STORE_PATH_HISTORY", "node2/history");
    let store_timeout_ms = parse_env!(lookup, "STORE_TIMEOUT_MS", u64, 5_000);

    let defaults = FieldNames::default();
    let fields = FieldNames {
        temperature: env_or!(lookup, "STORE_FIELD_TEMPERATURE", defaults.temperature),
        humidity: env_or!(lookup, "STORE_FIELD_HUMIDITY", defaults.humidity),
        luminosity: env_or!(lookup, "STORE_FIELD_LUMINOSITY", defaults.luminosity),
        sound: env_or!(lookup, "STORE_FIELD_SOUND", defaults.sound),
        timestamp: env_or!(lookup, "STORE_FIELD_TIMESTAMP", defaults.timestamp),
    };

    let gateway_url = env_or!(lookup, "GATEWAY_URL", DEFAULT_GATEWAY_URL);
    let gateway_timeout_ms = parse_env!(lookup, "GATEWAY_TIMEOUT_MS", u64, 5_000);
    let refresh_interval_ms = parse_env!(lookup, "REFRESH_INTERVAL_MS", u64, 2_000);
    let history_limit = parse_env!(lookup, "HISTORY_LIMIT", usize, 200);

    let base = Thresholds::default();
    let thresholds = Thresholds {
        temp_high: parse_env!(lookup, "TEMP_HIGH", f64, base.temp_high),
        sound_high: parse_env!(lookup, "SOUND_HIGH", i64, base.sound_high),
        lum_night: parse_env!(lookup, "LUM_NIGHT", i64, base.lum_night),
    };

    let bind_addr = parse_env!(
        lookup,
        "BIND_ADDR",
        SocketAddr,
        SocketAddr::from(([0, 0, 0, 0], 8080))
    );

    if refresh_interval_ms == 0 {
        return Err(anyhow!("Invalid REFRESH_INTERVAL_MS: must be greater than 0"));
    }

    Ok(Config {
        store_url: store_url.trim_end_matches('/').to_string(),
        store_auth,
        path_latest: path_latest.trim_matches('/').to_string(),
        path_history: path_history.trim_matches('/').to_string(),
        store_timeout: Duration::from_millis(store_timeout_ms),
        fields,
        gateway_url,
        gateway_timeout: Duration::from_millis(gateway_timeout_ms),
        refresh_interval: Duration::from_millis(refresh_interval_ms),
        history_limit,
        thresholds,
        bind_addr,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the store credential while showing all other configuration
    /// values that were loaded.
    pub fn log_config(&self) {
        // ---
        let masked_auth = match &self.store_auth {
            Some(_) => "****",
            None => "(none)",
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  STORE_URL          : {}", self.store_url);
        tracing::info!("  STORE_AUTH         : {}", masked_auth);
        tracing::info!("  STORE_PATH_LATEST  : {}", self.path_latest);
        tracing::info!("  STORE_PATH_HISTORY : {}", self.path_history);
        tracing::info!("  STORE_TIMEOUT      : {:?}", self.store_timeout);
        tracing::info!("  STORE_FIELDS       : {:?}", self.fields);
        tracing::info!("  GATEWAY_URL        : {}", self.gateway_url);
        tracing::info!("  GATEWAY_TIMEOUT    : {:?}", self.gateway_timeout);
        tracing::info!("  REFRESH_INTERVAL   : {:?}", self.refresh_interval);
        tracing::info!("  HISTORY_LIMIT      : {}", self.history_limit);
        tracing::info!("  THRESHOLDS         : {:?}", self.thresholds);
        tracing::info!("  BIND_ADDR          : {}", self.bind_addr);
    }
}
