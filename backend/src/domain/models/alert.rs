use chrono::{DateTime, Utc};
use shared::{IdKind, CALENDAR_ALERT_TYPE};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertType {
    Calendar,
    /// Alerts written by other producers, kept verbatim
    Other(String),
}

impl AlertType {
    pub fn as_str(&self) -> &str {
        match self {
            AlertType::Calendar => CALENDAR_ALERT_TYPE,
            AlertType::Other(kind) => kind,
        }
    }

    pub fn from_db(value: &str) -> Self {
        if value == CALENDAR_ALERT_TYPE {
            AlertType::Calendar
        } else {
            AlertType::Other(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainAlert {
    pub id: String,
    pub baby_id: String,
    pub alert_type: AlertType,
    pub calendar_event_id: Option<String>,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl DomainAlert {
    pub fn generate_id() -> String {
        IdKind::Alert.format_id(&Uuid::new_v4().to_string())
    }
}

/// Which existing calendar alerts count as "already notified" for an event.
///
/// Every scope is implicitly restricted to `alert_type = "calendar"` and the
/// event's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupScope {
    /// Any calendar alert for the event
    AnyCalendarAlert,
    /// Only calendar alerts whose title starts with the given prefix
    TitlePrefix(&'static str),
}
