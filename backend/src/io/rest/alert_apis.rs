//! # REST API for Alerts
//!
//! Alerts are listed per baby (see `baby_apis`); this router only handles
//! marking them read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use tracing::info;

use super::{check_path_id, error_response};
use crate::AppState;
use shared::IdKind;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/read", post(mark_alert_read))
}

async fn mark_alert_read(State(state): State<AppState>, Path(alert_id): Path<String>) -> impl IntoResponse {
    info!("POST /api/alerts/{}/read", alert_id);

    if let Err(response) = check_path_id(IdKind::Alert, &alert_id) {
        return response;
    }

    match state.alert_service.mark_alert_read(&alert_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to mark alert read", e),
    }
}
