//! # REST API for Notifications
//!
//! Administrative manual trigger: runs the upcoming pass and then the today
//! pass once, outside the scheduler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use super::error_response;
use super::mappers::NotificationMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/trigger", post(trigger_notifications))
}

async fn trigger_notifications(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/notifications/trigger");

    match state.notifier.trigger_once().await {
        Ok(result) => {
            let response = NotificationMapper::to_trigger_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to trigger notifications", e),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::domain::{DayWindow, FixedClock};
    use axum::http::StatusCode;
    use chrono::{Duration, Local, SecondsFormat, TimeZone};
    use shared::{
        AlertListResponse, BabyResponse, CreateBabyRequest, CreateCalendarEventRequest,
        TriggerNotificationsResponse,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_trigger_counts_and_idempotence() {
        let (_, mut state) = setup_test().await;
        let now = Local
            .with_ymd_and_hms(2025, 6, 14, 9, 30, 0)
            .earliest()
            .expect("valid local time");
        state.notifier = state.notifier.clone().with_clock(Arc::new(FixedClock(now)));
        let app = app(state);

        let request = CreateBabyRequest {
            name: "Mia".to_string(),
            birthdate: "2025-01-15".to_string(),
        };
        let (_, body) = send(&app, "POST", "/api/babies", Some(request)).await;
        let baby_id = json::<BabyResponse>(&body).baby.id;

        let tomorrow = DayWindow::tomorrow(now).start;
        let today = DayWindow::today(now).start;
        for date in [
            tomorrow + Duration::hours(9),
            tomorrow + Duration::hours(14),
            today + Duration::hours(18),
        ] {
            let event = CreateCalendarEventRequest {
                baby_id: baby_id.clone(),
                title: "Checkup".to_string(),
                description: None,
                date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
                time: None,
                reminder: true,
            };
            let (status, _) = send(&app, "POST", "/api/calendar", Some(event)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, "POST", "/api/notifications/trigger", None::<()>).await;
        assert_eq!(status, StatusCode::OK);
        let first: TriggerNotificationsResponse = json(&body);
        assert_eq!(first.upcoming_notifications, 2);
        assert_eq!(first.today_notifications, 1);
        assert_eq!(first.upcoming_created, 2);
        assert_eq!(first.today_created, 1);

        let raw: serde_json::Value = json(&body);
        assert_eq!(raw["upcomingNotifications"], 2);
        assert_eq!(raw["todayNotifications"], 1);

        let (_, body) = send(&app, "POST", "/api/notifications/trigger", None::<()>).await;
        let second: TriggerNotificationsResponse = json(&body);
        assert_eq!(second.upcoming_notifications, 2);
        assert_eq!(second.upcoming_created, 0);
        assert_eq!(second.today_created, 0);

        let (_, body) = send(&app, "GET", &format!("/api/babies/{}/alerts", baby_id), None::<()>).await;
        assert_eq!(json::<AlertListResponse>(&body).alerts.len(), 3);
    }
}
