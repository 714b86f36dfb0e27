use chrono::SecondsFormat;

use crate::domain::models::DomainAlert;
use shared::{Alert, AlertListResponse};

pub struct AlertMapper;

impl AlertMapper {
    pub fn to_dto(domain: DomainAlert) -> Alert {
        Alert {
            id: domain.id,
            baby_id: domain.baby_id,
            alert_type: domain.alert_type.as_str().to_string(),
            calendar_event_id: domain.calendar_event_id,
            title: domain.title,
            message: domain.message,
            read: domain.read,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_list_response(alerts: Vec<DomainAlert>) -> AlertListResponse {
        AlertListResponse {
            alerts: alerts.into_iter().map(Self::to_dto).collect(),
        }
    }
}
