pub mod alert_repository;
pub mod baby_repository;
pub mod calendar_event_repository;

pub use alert_repository::AlertRepository;
pub use baby_repository::BabyRepository;
pub use calendar_event_repository::CalendarEventRepository;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

/// Convert a stored epoch-millis column back into a UTC instant
pub(crate) fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Stored timestamp out of range: {}", millis))
}
