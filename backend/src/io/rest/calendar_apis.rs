//! # REST API for Calendar Events

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use super::{check_path_id, error_response};
use super::mappers::CalendarEventMapper;
use crate::AppState;
use shared::{CreateCalendarEventRequest, IdKind, UpdateCalendarEventRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
        .route("/:id/complete", post(complete_event))
}

async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateCalendarEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/calendar - request: {:?}", request);

    match state.calendar_service.create_event(request).await {
        Ok(event) => {
            let response = CalendarEventMapper::to_response(event, "Calendar event created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to create calendar event", e),
    }
}

async fn get_event(State(state): State<AppState>, Path(event_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/calendar/{}", event_id);

    if let Err(response) = check_path_id(IdKind::Event, &event_id) {
        return response;
    }

    match state.calendar_service.get_event(&event_id).await {
        Ok(Some(event)) => (StatusCode::OK, Json(CalendarEventMapper::to_dto(event))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Calendar event not found").into_response(),
        Err(e) => error_response("Failed to get calendar event", e),
    }
}

async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<UpdateCalendarEventRequest>,
) -> impl IntoResponse {
    info!("PUT /api/calendar/{} - request: {:?}", event_id, request);

    if let Err(response) = check_path_id(IdKind::Event, &event_id) {
        return response;
    }

    match state.calendar_service.update_event(&event_id, request).await {
        Ok(event) => {
            let response = CalendarEventMapper::to_response(event, "Calendar event updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to update calendar event", e),
    }
}

/// Mark an event done; no further reminders are sent for it
async fn complete_event(State(state): State<AppState>, Path(event_id): Path<String>) -> impl IntoResponse {
    info!("POST /api/calendar/{}/complete", event_id);

    if let Err(response) = check_path_id(IdKind::Event, &event_id) {
        return response;
    }

    match state.calendar_service.complete_event(&event_id).await {
        Ok(event) => {
            let response = CalendarEventMapper::to_response(event, "Calendar event completed");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to complete calendar event", e),
    }
}

async fn delete_event(State(state): State<AppState>, Path(event_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/calendar/{}", event_id);

    if let Err(response) = check_path_id(IdKind::Event, &event_id) {
        return response;
    }

    match state.calendar_service.delete_event(&event_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete calendar event", e),
    }
}
