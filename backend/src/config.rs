//! # Configuration
//!
//! Runtime settings for the backend, read from `BABYCARE_*` environment
//! variables. Every setting has a default so a bare `cargo run` starts a
//! local server against `babycare.db`.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::DEFAULT_NOTIFICATION_INTERVAL;

const DEFAULT_DATABASE_URL: &str = "sqlite:babycare.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Lower bound for the scheduler interval, avoids a tight polling loop
const MIN_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub notification_interval: Duration,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("BABYCARE_DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BABYCARE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("Invalid BABYCARE_BIND_ADDR: {}", bind_addr))?;

        let cors_origin = lookup("BABYCARE_CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let notification_interval = match lookup("BABYCARE_NOTIFICATION_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().with_context(|| {
                    format!("Invalid BABYCARE_NOTIFICATION_INTERVAL_SECS: {}", raw)
                })?;
                Duration::from_secs(secs).max(MIN_NOTIFICATION_INTERVAL)
            }
            None => DEFAULT_NOTIFICATION_INTERVAL,
        };

        let db_max_connections = match lookup("BABYCARE_DB_MAX_CONNECTIONS") {
            Some(raw) => {
                let max: u32 = raw.trim().parse().with_context(|| {
                    format!("Invalid BABYCARE_DB_MAX_CONNECTIONS: {}", raw)
                })?;
                if max == 0 {
                    anyhow::bail!("BABYCARE_DB_MAX_CONNECTIONS must be at least 1");
                }
                max
            }
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            notification_interval,
            db_max_connections,
        })
    }
}
