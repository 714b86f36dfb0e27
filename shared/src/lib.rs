use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert type written for calendar reminders
pub const CALENDAR_ALERT_TYPE: &str = "calendar";

/// Baby ID in format: "baby::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub id: String,
    pub name: String,
    /// Birthdate in YYYY-MM-DD format
    pub birthdate: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBabyRequest {
    pub name: String,
    pub birthdate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBabyRequest {
    pub name: Option<String>,
    pub birthdate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyResponse {
    pub baby: Baby,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyListResponse {
    pub babies: Vec<Baby>,
}

/// A scheduled occurrence on a baby's calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub baby_id: String,
    /// Name of the owning baby, when it could be resolved
    pub baby_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// Absolute date of the event (RFC 3339)
    pub date: String,
    /// Time of day for display only, e.g. "10:00"
    pub time: Option<String>,
    /// Whether reminder notifications should fire
    pub reminder: bool,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCalendarEventRequest {
    pub baby_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Absolute date of the event (RFC 3339)
    pub date: String,
    pub time: Option<String>,
    #[serde(default = "default_reminder")]
    pub reminder: bool,
}

fn default_reminder() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCalendarEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reminder: Option<bool>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventResponse {
    pub event: CalendarEvent,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventListResponse {
    pub events: Vec<CalendarEvent>,
}

/// A persisted notification for a baby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub baby_id: String,
    /// Discriminator, "calendar" for calendar reminders
    pub alert_type: String,
    pub calendar_event_id: Option<String>,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
}

/// Result of a manual notification pass.
///
/// `*_notifications` count qualifying events; `*_created` count the alerts
/// the pass actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerNotificationsResponse {
    pub upcoming_notifications: u32,
    pub today_notifications: u32,
    pub upcoming_created: u32,
    pub today_created: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Prefixed identifiers: "baby::<uuid>", "event::<uuid>", "alert::<uuid>"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Baby,
    Event,
    Alert,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Baby => "baby",
            IdKind::Event => "event",
            IdKind::Alert => "alert",
        }
    }

    /// Build an id of this kind around an opaque suffix
    pub fn format_id(&self, suffix: &str) -> String {
        format!("{}::{}", self.prefix(), suffix)
    }

    /// Split an id of this kind and return its suffix
    pub fn parse_id<'a>(&self, id: &'a str) -> Result<&'a str, IdError> {
        let (prefix, suffix) = id
            .split_once("::")
            .ok_or_else(|| IdError::InvalidFormat(id.to_string()))?;
        if prefix != self.prefix() {
            return Err(IdError::WrongKind {
                expected: self.prefix(),
                found: prefix.to_string(),
            });
        }
        if suffix.is_empty() {
            return Err(IdError::InvalidFormat(id.to_string()));
        }
        Ok(suffix)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdError {
    InvalidFormat(String),
    WrongKind { expected: &'static str, found: String },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::InvalidFormat(id) => write!(f, "Invalid id format: {}", id),
            IdError::WrongKind { expected, found } => {
                write!(f, "Expected {} id, found {} id", expected, found)
            }
        }
    }
}

impl std::error::Error for IdError {}
