//! Conversions from domain models to the shared wire DTOs.

pub mod alert_mapper;
pub mod baby_mapper;
pub mod calendar_event_mapper;
pub mod notification_mapper;

pub use alert_mapper::AlertMapper;
pub use baby_mapper::BabyMapper;
pub use calendar_event_mapper::CalendarEventMapper;
pub use notification_mapper::NotificationMapper;
