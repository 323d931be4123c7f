//! Configuration management for the vinyl cataloging tool.
//!
//! Configuration values come from environment variables and a `.env` file in
//! the local data directory. Environment variables that are already set take
//! precedence over the file, and every value except the Discogs credentials
//! has a default.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.discogs.com";
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 1100;
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot create data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("Cannot parse .env file: {0}")]
    EnvFile(String),

    #[error("Set DISCOGS_TOKEN or DISCOGS_KEY and DISCOGS_SECRET")]
    MissingCredentials,
}

/// How requests to Discogs authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    KeySecret { key: String, secret: String },
}

impl Credentials {
    /// Value of the `Authorization` header for this credential.
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Token(token) => format!("Discogs token={}", token),
            Credentials::KeySecret { key, secret } => {
                format!("Discogs key={}, secret={}", key, secret)
            }
        }
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The directory is created if it does not exist yet. A missing `.env` file is
/// fine since everything can also be set in the environment directly.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/vinylcli/.env`
/// - macOS: `~/Library/Application Support/vinylcli/.env`
/// - Windows: `%LOCALAPPDATA%/vinylcli/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::EnvFile(e.to_string())),
    }
}

/// Platform local data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vinylcli");
    path
}

/// Discogs credentials, preferring a personal token over key and secret.
///
/// # Errors
///
/// Returns `ConfigError::MissingCredentials` when neither `DISCOGS_TOKEN` nor
/// both of `DISCOGS_KEY` and `DISCOGS_SECRET` are set.
pub fn credentials() -> Result<Credentials, ConfigError> {
    if let Some(token) = non_empty_var("DISCOGS_TOKEN") {
        return Ok(Credentials::Token(token));
    }

    match (non_empty_var("DISCOGS_KEY"), non_empty_var("DISCOGS_SECRET")) {
        (Some(key), Some(secret)) => Ok(Credentials::KeySecret { key, secret }),
        _ => Err(ConfigError::MissingCredentials),
    }
}

/// Base URL of the Discogs API, e.g. `https://api.discogs.com`.
pub fn discogs_api_url() -> String {
    non_empty_var("DISCOGS_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Minimum time between the start of two requests to Discogs.
///
/// Unauthenticated clients get 25 requests a minute, authenticated ones 60,
/// so the default stays a little above one request per second.
pub fn request_interval() -> Duration {
    let millis = non_empty_var("DISCOGS_REQUEST_INTERVAL_MS")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_REQUEST_INTERVAL_MS);
    Duration::from_millis(millis)
}

/// Location of the collection file.
pub fn collection_path() -> PathBuf {
    non_empty_var("VINYLCLI_COLLECTION")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("records.json"))
}

/// Directory downloaded cover images are stored in.
///
/// Defaults to `assets/` next to the collection file.
pub fn assets_dir() -> PathBuf {
    if let Some(dir) = non_empty_var("VINYLCLI_ASSETS") {
        return PathBuf::from(dir);
    }

    let collection = collection_path();
    collection
        .parent()
        .map(|p| p.join("assets"))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

/// Currency recorded for hand-made records.
pub fn currency() -> String {
    non_empty_var("VINYLCLI_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

/// Address the barcode listener binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> String {
    non_empty_var("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
