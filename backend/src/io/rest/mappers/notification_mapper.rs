use crate::domain::TriggerResult;
use shared::TriggerNotificationsResponse;

pub struct NotificationMapper;

impl NotificationMapper {
    pub fn to_trigger_response(result: TriggerResult) -> TriggerNotificationsResponse {
        TriggerNotificationsResponse {
            upcoming_notifications: result.upcoming.candidate_count,
            today_notifications: result.today.candidate_count,
            upcoming_created: result.upcoming.created_count,
            today_created: result.today.created_count,
        }
    }
}
