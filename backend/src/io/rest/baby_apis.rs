//! # REST API for Baby Profiles
//!
//! Endpoints for creating, retrieving, updating and deleting babies, plus the
//! per-baby calendar and alert listings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::{check_path_id, error_response};
use super::mappers::{AlertMapper, BabyMapper, CalendarEventMapper};
use crate::AppState;
use shared::{CreateBabyRequest, IdKind, UpdateBabyRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_babies).post(create_baby))
        .route("/:id", get(get_baby).put(update_baby).delete(delete_baby))
        .route("/:id/calendar", get(list_baby_calendar))
        .route("/:id/alerts", get(list_baby_alerts))
}

/// Optional `[start, end)` bounds for a calendar listing
#[derive(Debug, Deserialize)]
pub struct CalendarRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Create a new baby
async fn create_baby(
    State(state): State<AppState>,
    Json(request): Json<CreateBabyRequest>,
) -> impl IntoResponse {
    info!("POST /api/babies - request: {:?}", request);

    match state.baby_service.create_baby(request).await {
        Ok(baby) => {
            let response = BabyMapper::to_response(baby, "Baby created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to create baby", e),
    }
}

/// List all babies
async fn list_babies(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/babies");

    match state.baby_service.list_babies().await {
        Ok(babies) => (StatusCode::OK, Json(BabyMapper::to_list_response(babies))).into_response(),
        Err(e) => error_response("Failed to list babies", e),
    }
}

/// Get a baby by ID
async fn get_baby(State(state): State<AppState>, Path(baby_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/babies/{}", baby_id);

    if let Err(response) = check_path_id(IdKind::Baby, &baby_id) {
        return response;
    }

    match state.baby_service.require_baby(&baby_id).await {
        Ok(baby) => (StatusCode::OK, Json(BabyMapper::to_dto(baby))).into_response(),
        Err(e) => error_response("Failed to get baby", e),
    }
}

/// Update a baby
async fn update_baby(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Json(request): Json<UpdateBabyRequest>,
) -> impl IntoResponse {
    info!("PUT /api/babies/{} - request: {:?}", baby_id, request);

    if let Err(response) = check_path_id(IdKind::Baby, &baby_id) {
        return response;
    }

    match state.baby_service.update_baby(&baby_id, request).await {
        Ok(baby) => {
            let response = BabyMapper::to_response(baby, "Baby updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to update baby", e),
    }
}

/// Delete a baby and everything attached to it
async fn delete_baby(State(state): State<AppState>, Path(baby_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/babies/{}", baby_id);

    if let Err(response) = check_path_id(IdKind::Baby, &baby_id) {
        return response;
    }

    match state.baby_service.delete_baby(&baby_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete baby", e),
    }
}

/// List a baby's calendar events, ordered by date
async fn list_baby_calendar(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Query(range): Query<CalendarRangeQuery>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}/calendar - range: {:?}", baby_id, range);

    if let Err(response) = check_path_id(IdKind::Baby, &baby_id) {
        return response;
    }

    match state
        .calendar_service
        .list_events_for_baby(&baby_id, range.start.as_deref(), range.end.as_deref())
        .await
    {
        Ok(events) => (StatusCode::OK, Json(CalendarEventMapper::to_list_response(events))).into_response(),
        Err(e) => error_response("Failed to list calendar events", e),
    }
}

/// List a baby's alerts, newest first
async fn list_baby_alerts(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}/alerts", baby_id);

    if let Err(response) = check_path_id(IdKind::Baby, &baby_id) {
        return response;
    }

    if let Err(e) = state.baby_service.require_baby(&baby_id).await {
        return error_response("Failed to list alerts", e);
    }

    match state.alert_service.list_alerts_for_baby(&baby_id).await {
        Ok(alerts) => (StatusCode::OK, Json(AlertMapper::to_list_response(alerts))).into_response(),
        Err(e) => error_response("Failed to list alerts", e),
    }
}
