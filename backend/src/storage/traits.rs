//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. Services hold these as
//! `Arc<dyn ...>` so tests can swap in alternative implementations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{
    DedupScope, DomainAlert, DomainBaby, DomainCalendarEvent, EventFilter,
};

/// Storage operations for baby profiles
#[async_trait]
pub trait BabyStorage: Send + Sync {
    /// Store a new baby
    async fn store_baby(&self, baby: &DomainBaby) -> Result<()>;

    /// Retrieve a specific baby by ID
    async fn get_baby(&self, baby_id: &str) -> Result<Option<DomainBaby>>;

    /// List all babies ordered by name
    async fn list_babies(&self) -> Result<Vec<DomainBaby>>;

    /// Update an existing baby
    async fn update_baby(&self, baby: &DomainBaby) -> Result<()>;

    /// Delete a baby together with its calendar events and alerts.
    /// Returns true if the baby existed.
    async fn delete_baby(&self, baby_id: &str) -> Result<bool>;
}

/// Storage operations for calendar events
#[async_trait]
pub trait CalendarEventStorage: Send + Sync {
    /// Store a new event
    async fn store_event(&self, event: &DomainCalendarEvent) -> Result<()>;

    /// Retrieve a specific event by ID, with the owning baby's name
    async fn get_event(&self, event_id: &str) -> Result<Option<DomainCalendarEvent>>;

    /// List a baby's events ordered by date, optionally limited to `[start, end)`
    async fn list_events_for_baby(
        &self,
        baby_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<DomainCalendarEvent>>;

    /// Find events of every baby with `date` in `[start, end)` matching the
    /// flag filter. Results come back in store order, unsorted.
    async fn find_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: EventFilter,
    ) -> Result<Vec<DomainCalendarEvent>>;

    /// Update an existing event
    async fn update_event(&self, event: &DomainCalendarEvent) -> Result<()>;

    /// Delete an event. Returns true if it existed.
    async fn delete_event(&self, event_id: &str) -> Result<bool>;
}

/// Storage operations for alerts
#[async_trait]
pub trait AlertStorage: Send + Sync {
    /// Store a calendar alert only if no alert in `scope` exists for its
    /// event. The check and the insert are a single statement.
    /// Returns true if the alert was written.
    async fn store_calendar_alert_if_absent(
        &self,
        alert: &DomainAlert,
        scope: DedupScope,
    ) -> Result<bool>;

    /// Find one calendar alert for an event within `scope`
    async fn find_calendar_alert(
        &self,
        calendar_event_id: &str,
        scope: DedupScope,
    ) -> Result<Option<DomainAlert>>;

    /// List a baby's alerts, newest first
    async fn list_alerts_for_baby(&self, baby_id: &str) -> Result<Vec<DomainAlert>>;

    /// Mark an alert as read. Returns true if it existed.
    async fn mark_alert_read(&self, alert_id: &str) -> Result<bool>;
}
