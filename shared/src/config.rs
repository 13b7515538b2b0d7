use std::env;

use crate::errors::{Result, ServiceError};

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ServiceError::Config(format!("{} not set", key))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Credentials and location of the record store.
#[derive(Clone)]
pub struct StoreConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub endpoint_url: String,
}

impl StoreConfig {
    pub const DEFAULT_TABLE: &'static str = "Submissions";
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.airtable.com";

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: required("AIRTABLE_API_KEY")?,
            base_id: required("AIRTABLE_BASE_ID")?,
            table_name: optional("AIRTABLE_TABLE_NAME", Self::DEFAULT_TABLE),
            endpoint_url: optional("AIRTABLE_ENDPOINT_URL", Self::DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

// The API key never shows up in logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_key", &"***")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Public keys for the two identity providers. Both are safe to hand to the browser.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub magic_publishable_key: String,
    pub neynar_client_id: String,
}

impl IdentityConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            magic_publishable_key: required("MAGIC_PUBLISHABLE_KEY")?,
            neynar_client_id: optional("NEYNAR_CLIENT_ID", ""),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub metrics_port: Option<u16>,
    pub static_dir: String,
}

impl ServiceConfig {
    pub fn from_env(default_port: u16) -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid PORT: {}", e)))?,
            Err(_) => default_port,
        };

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|e| ServiceError::Config(format!("Invalid METRICS_PORT: {}", e)))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            port,
            metrics_port,
            static_dir: optional("STATIC_DIR", "public"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub submit_url: String,
    pub identity: IdentityConfig,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            submit_url: optional("SUBMIT_URL", "http://localhost:3000/api/submit"),
            identity: IdentityConfig::from_env()?,
        })
    }
}
