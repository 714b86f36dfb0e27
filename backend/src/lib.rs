//! # Baby-Care Backend
//!
//! Baby profiles, a per-baby calendar, and reminder alerts generated from
//! calendar events.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API under /api)
//!     ↓
//! Domain Layer (services, notifier, scheduler)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AlertService, BabyService, CalendarNotifier, CalendarService};
use crate::storage::{AlertRepository, BabyRepository, CalendarEventRepository, DbConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub baby_service: BabyService,
    pub calendar_service: CalendarService,
    pub alert_service: AlertService,
    pub notifier: CalendarNotifier,
}

impl AppState {
    /// Wire every service to one database connection
    pub fn new(db: DbConnection) -> Self {
        let events = Arc::new(CalendarEventRepository::new(db.clone()));
        let baby_service = BabyService::new(Arc::new(BabyRepository::new(db.clone())));
        let alert_service = AlertService::new(Arc::new(AlertRepository::new(db)));
        let calendar_service = CalendarService::new(events.clone(), baby_service.clone());
        let notifier = CalendarNotifier::new(events, alert_service.clone());

        Self {
            baby_service,
            calendar_service,
            alert_service,
            notifier,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url, config.db_max_connections).await?;

    info!("Setting up domain services");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_router_rejects_bad_origin() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let config = AppConfig {
            cors_origin: "bad\norigin".to_string(),
            ..AppConfig::default()
        };

        assert!(create_router(AppState::new(db.clone()), &config).is_err());
        assert!(create_router(AppState::new(db), &AppConfig::default()).is_ok());
    }
}
