use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::{AlertType, DedupScope, DomainAlert, NotFoundError};
use crate::storage::AlertStorage;

/// Service for reading and creating alerts
#[derive(Clone)]
pub struct AlertService {
    storage: Arc<dyn AlertStorage>,
}

impl AlertService {
    pub fn new(storage: Arc<dyn AlertStorage>) -> Self {
        Self { storage }
    }

    /// Create a calendar alert for an event unless one already exists in `scope`.
    ///
    /// Returns the new alert, or `None` when an existing alert in the same
    /// scope prevented the write.
    pub async fn create_calendar_alert(
        &self,
        baby_id: &str,
        calendar_event_id: &str,
        title: &str,
        message: &str,
        scope: DedupScope,
    ) -> Result<Option<DomainAlert>> {
        let alert = DomainAlert {
            id: DomainAlert::generate_id(),
            baby_id: baby_id.to_string(),
            alert_type: AlertType::Calendar,
            calendar_event_id: Some(calendar_event_id.to_string()),
            title: title.to_string(),
            message: message.to_string(),
            read: false,
            created_at: Utc::now(),
        };

        if self.storage.store_calendar_alert_if_absent(&alert, scope).await? {
            info!("Created calendar alert {} for event {}: {}", alert.id, calendar_event_id, title);
            Ok(Some(alert))
        } else {
            debug!("Calendar alert for event {} already exists in {:?}", calendar_event_id, scope);
            Ok(None)
        }
    }

    /// Find an existing calendar alert for an event within `scope`
    pub async fn find_calendar_alert(
        &self,
        calendar_event_id: &str,
        scope: DedupScope,
    ) -> Result<Option<DomainAlert>> {
        self.storage.find_calendar_alert(calendar_event_id, scope).await
    }

    /// List a baby's alerts, newest first
    pub async fn list_alerts_for_baby(&self, baby_id: &str) -> Result<Vec<DomainAlert>> {
        let alerts = self.storage.list_alerts_for_baby(baby_id).await?;
        info!("Found {} alerts for baby {}", alerts.len(), baby_id);
        Ok(alerts)
    }

    /// Mark an alert as read
    pub async fn mark_alert_read(&self, alert_id: &str) -> Result<()> {
        if !self.storage.mark_alert_read(alert_id).await? {
            return Err(NotFoundError::new("Alert", alert_id).into());
        }
        info!("Marked alert {} as read", alert_id);
        Ok(())
    }
}
