use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::baby_service::BabyService;
use crate::domain::day_window::local_midnight;
use crate::domain::models::{CalendarEventValidationError, DomainCalendarEvent, NotFoundError};
use crate::storage::CalendarEventStorage;
use shared::{CreateCalendarEventRequest, UpdateCalendarEventRequest};

const MAX_TITLE_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 2000;
const MAX_TIME_CHARS: usize = 32;

/// Service for creating and editing calendar events
#[derive(Clone)]
pub struct CalendarService {
    events: Arc<dyn CalendarEventStorage>,
    baby_service: BabyService,
}

impl CalendarService {
    pub fn new(events: Arc<dyn CalendarEventStorage>, baby_service: BabyService) -> Self {
        Self { events, baby_service }
    }

    /// Create a new calendar event for an existing baby
    pub async fn create_event(&self, request: CreateCalendarEventRequest) -> Result<DomainCalendarEvent> {
        info!("Creating calendar event: baby={}, title={}", request.baby_id, request.title);

        let title = validate_title(&request.title)?;
        let description = normalize_optional(request.description, MAX_DESCRIPTION_CHARS)
            .map_err(|_| CalendarEventValidationError::DescriptionTooLong)?;
        let time = normalize_optional(request.time, MAX_TIME_CHARS)
            .map_err(|_| CalendarEventValidationError::TimeTooLong)?;
        let date = parse_event_date(&request.date)?;

        let baby = self.baby_service.require_baby(&request.baby_id).await?;

        let now = Utc::now().to_rfc3339();
        let event = DomainCalendarEvent {
            id: DomainCalendarEvent::generate_id(),
            baby_id: baby.id,
            baby_name: Some(baby.name),
            title,
            description,
            date,
            time,
            reminder: request.reminder,
            completed: false,
            created_at: now.clone(),
            updated_at: now,
        };

        self.events.store_event(&event).await?;

        info!("Created calendar event {} on {}", event.id, event.date.to_rfc3339());
        Ok(event)
    }

    /// Get an event by ID
    pub async fn get_event(&self, event_id: &str) -> Result<Option<DomainCalendarEvent>> {
        let event = self.events.get_event(event_id).await?;
        if event.is_none() {
            warn!("Calendar event not found: {}", event_id);
        }
        Ok(event)
    }

    /// List a baby's events, optionally bounded by RFC 3339 / YYYY-MM-DD dates
    pub async fn list_events_for_baby(
        &self,
        baby_id: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<DomainCalendarEvent>> {
        self.baby_service.require_baby(baby_id).await?;

        let start = start.map(parse_event_date).transpose()?;
        let end = end.map(parse_event_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(CalendarEventValidationError::InvalidRange.into());
            }
        }

        let events = self.events.list_events_for_baby(baby_id, start, end).await?;
        info!("Found {} calendar events for baby {}", events.len(), baby_id);
        Ok(events)
    }

    /// Apply a partial update to an event
    pub async fn update_event(
        &self,
        event_id: &str,
        request: UpdateCalendarEventRequest,
    ) -> Result<DomainCalendarEvent> {
        info!("Updating calendar event: {}", event_id);

        let mut event = self.require_event(event_id).await?;

        if let Some(title) = request.title {
            event.title = validate_title(&title)?;
        }
        if let Some(description) = request.description {
            event.description = normalize_optional(Some(description), MAX_DESCRIPTION_CHARS)
                .map_err(|_| CalendarEventValidationError::DescriptionTooLong)?;
        }
        if let Some(time) = request.time {
            event.time = normalize_optional(Some(time), MAX_TIME_CHARS)
                .map_err(|_| CalendarEventValidationError::TimeTooLong)?;
        }
        if let Some(date) = request.date {
            event.date = parse_event_date(&date)?;
        }
        if let Some(reminder) = request.reminder {
            event.reminder = reminder;
        }
        if let Some(completed) = request.completed {
            event.completed = completed;
        }
        event.updated_at = Utc::now().to_rfc3339();

        self.events.update_event(&event).await?;

        info!("Updated calendar event {}", event.id);
        Ok(event)
    }

    /// Mark an event as completed, which stops further reminders for it
    pub async fn complete_event(&self, event_id: &str) -> Result<DomainCalendarEvent> {
        self.update_event(
            event_id,
            UpdateCalendarEventRequest {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete an event. Alerts already created for it are kept.
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        info!("Deleting calendar event: {}", event_id);

        if !self.events.delete_event(event_id).await? {
            return Err(NotFoundError::new("Calendar event", event_id).into());
        }
        Ok(())
    }

    async fn require_event(&self, event_id: &str) -> Result<DomainCalendarEvent> {
        self.get_event(event_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Calendar event", event_id).into())
    }
}

fn validate_title(title: &str) -> Result<String, CalendarEventValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CalendarEventValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(CalendarEventValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Trim optional text; blank becomes `None`. Errs when over `max_chars`.
fn normalize_optional(value: Option<String>, max_chars: usize) -> Result<Option<String>, ()> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Ok(None),
        Some(v) if v.chars().count() > max_chars => Err(()),
        other => Ok(other),
    }
}

/// Accepts an RFC 3339 instant, or a bare `YYYY-MM-DD` meaning local midnight
pub(crate) fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, CalendarEventValidationError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(local_midnight)
        .map_err(|_| CalendarEventValidationError::InvalidDate(raw.to_string()))
}
