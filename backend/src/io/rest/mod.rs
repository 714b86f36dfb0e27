//! # REST API Interface Layer
//!
//! HTTP endpoints for the baby-care backend, all nested under `/api`.
//! Handlers translate JSON to service calls and domain errors to status
//! codes; they hold no business logic.
//!
//! | Error | Status |
//! |---|---|
//! | malformed or wrong-kind path id | 400 |
//! | `BabyValidationError`, `CalendarEventValidationError` | 400 |
//! | `NotFoundError` | 404 |
//! | anything else | 500 |

pub mod alert_apis;
pub mod baby_apis;
pub mod calendar_apis;
pub mod mappers;
pub mod notification_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::{error, warn};

use crate::domain::models::{BabyValidationError, CalendarEventValidationError, NotFoundError};
use crate::AppState;
use shared::{HealthResponse, IdKind};

/// All API routes, without the `/api` prefix or middleware
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/babies", baby_apis::router())
        .nest("/calendar", calendar_apis::router())
        .nest("/alerts", alert_apis::router())
        .nest("/notifications", notification_apis::router())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// HTTP status for a service error
pub fn error_status(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<BabyValidationError>().is_some()
        || err.downcast_ref::<CalendarEventValidationError>().is_some()
    {
        StatusCode::BAD_REQUEST
    } else if err.downcast_ref::<NotFoundError>().is_some() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Reject a path id that isn't a well-formed id of `kind`
pub(crate) fn check_path_id(kind: IdKind, id: &str) -> Result<(), Response> {
    kind.parse_id(id).map(|_| ()).map_err(|e| {
        warn!("Rejected path id {}: {}", id, e);
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    })
}

/// Log a service error and turn it into a plain-text response.
/// Internal errors don't leak their details to the client.
pub(crate) fn error_response(context: &str, err: anyhow::Error) -> Response {
    let status = error_status(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("{}: {:#}", context, err);
        (status, context.to_string()).into_response()
    } else {
        warn!("{}: {}", context, err);
        (status, err.to_string()).into_response()
    }
}
