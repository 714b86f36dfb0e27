use chrono::{DateTime, Utc};
use shared::IdKind;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct DomainCalendarEvent {
    pub id: String,
    pub baby_id: String,
    /// Filled in by queries that join the owning baby
    pub baby_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    /// Display-only time of day, e.g. "10:00"
    pub time: Option<String>,
    pub reminder: bool,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl DomainCalendarEvent {
    pub fn generate_id() -> String {
        IdKind::Event.format_id(&Uuid::new_v4().to_string())
    }
}

/// Flag filters applied by range queries. `None` means "don't care".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub reminder: Option<bool>,
    pub completed: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarEventValidationError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event title cannot exceed 200 characters")]
    TitleTooLong,
    #[error("Event description cannot exceed 2000 characters")]
    DescriptionTooLong,
    #[error("Event time cannot exceed 32 characters")]
    TimeTooLong,
    #[error("Invalid event date: {0}. Expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid date range: start must be before end")]
    InvalidRange,
}
