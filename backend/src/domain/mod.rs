//! # Domain Module
//!
//! Business logic for the baby-care backend.
//!
//! - **Baby / calendar / alert services**: validated CRUD over the storage traits
//! - **Calendar notifications**: the upcoming and today reminder passes
//! - **Notification scheduler**: runs both passes periodically in the background
//!
//! Services depend only on the traits in `crate::storage`, never on SQLite
//! directly.

pub mod alert_service;
pub mod baby_service;
pub mod calendar_notifications;
pub mod calendar_service;
pub mod day_window;
pub mod models;
pub mod notification_scheduler;

pub use alert_service::AlertService;
pub use baby_service::BabyService;
pub use calendar_notifications::{
    CalendarNotifier, NotificationClass, PassOutcome, TriggerResult, TODAY_DEDUP_SCOPE,
    UPCOMING_DEDUP_SCOPE,
};
pub use calendar_service::CalendarService;
pub use day_window::{Clock, DayWindow, FixedClock, SystemClock};
pub use notification_scheduler::{
    NotificationScheduler, SchedulerHandle, TickReport, DEFAULT_NOTIFICATION_INTERVAL,
};
