use chrono::SecondsFormat;

use crate::domain::models::DomainCalendarEvent;
use shared::{CalendarEvent, CalendarEventListResponse, CalendarEventResponse};

/// Mapper from domain events to shared CalendarEvent DTOs
pub struct CalendarEventMapper;

impl CalendarEventMapper {
    /// Dates go out as RFC 3339 UTC with millisecond precision
    pub fn to_dto(domain: DomainCalendarEvent) -> CalendarEvent {
        CalendarEvent {
            id: domain.id,
            baby_id: domain.baby_id,
            baby_name: domain.baby_name,
            title: domain.title,
            description: domain.description,
            date: domain.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            time: domain.time,
            reminder: domain.reminder,
            completed: domain.completed,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_response(domain: DomainCalendarEvent, success_message: &str) -> CalendarEventResponse {
        CalendarEventResponse {
            event: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_response(events: Vec<DomainCalendarEvent>) -> CalendarEventListResponse {
        CalendarEventListResponse {
            events: events.into_iter().map(Self::to_dto).collect(),
        }
    }
}
