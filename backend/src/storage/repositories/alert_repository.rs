use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::millis_to_utc;
use crate::domain::models::{AlertType, DedupScope, DomainAlert};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AlertStorage;
use shared::CALENDAR_ALERT_TYPE;

/// SQLite repository for alerts
#[derive(Clone)]
pub struct AlertRepository {
    db: DbConnection,
}

impl AlertRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store an alert unconditionally, bypassing the dedup check
    #[cfg(test)]
    pub async fn store_alert(&self, alert: &DomainAlert) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO alerts
                (id, baby_id, alert_type, calendar_event_id, title, message, is_read, created_at_millis)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert.id)
        .bind(&alert.baby_id)
        .bind(alert.alert_type.as_str())
        .bind(&alert.calendar_event_id)
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.read)
        .bind(alert.created_at.timestamp_millis())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

/// Extra predicate narrowing a dedup lookup, bound after event id and type
fn scope_predicate(scope: DedupScope) -> &'static str {
    match scope {
        DedupScope::AnyCalendarAlert => "",
        DedupScope::TitlePrefix(_) => "AND substr(title, 1, length(?)) = ?",
    }
}

fn scope_prefix(scope: DedupScope) -> Option<&'static str> {
    match scope {
        DedupScope::AnyCalendarAlert => None,
        DedupScope::TitlePrefix(prefix) => Some(prefix),
    }
}

fn alert_from_row(row: &SqliteRow) -> Result<DomainAlert> {
    let alert_type: String = row.get("alert_type");
    Ok(DomainAlert {
        id: row.get("id"),
        baby_id: row.get("baby_id"),
        alert_type: AlertType::from_db(&alert_type),
        calendar_event_id: row.get("calendar_event_id"),
        title: row.get("title"),
        message: row.get("message"),
        read: row.get("is_read"),
        created_at: millis_to_utc(row.get("created_at_millis"))?,
    })
}

#[async_trait]
impl AlertStorage for AlertRepository {
    async fn store_calendar_alert_if_absent(
        &self,
        alert: &DomainAlert,
        scope: DedupScope,
    ) -> Result<bool> {
        let event_id = alert
            .calendar_event_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Calendar alert {} has no calendar event id", alert.id))?;
        if alert.alert_type != AlertType::Calendar {
            anyhow::bail!("Alert {} is not a calendar alert", alert.id);
        }

        let sql = format!(
            r#"
            INSERT INTO alerts
                (id, baby_id, alert_type, calendar_event_id, title, message, is_read, created_at_millis)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM alerts
                WHERE calendar_event_id = ? AND alert_type = ? {}
            )
            "#,
            scope_predicate(scope)
        );

        let mut query = sqlx::query(&sql)
            .bind(&alert.id)
            .bind(&alert.baby_id)
            .bind(CALENDAR_ALERT_TYPE)
            .bind(event_id)
            .bind(&alert.title)
            .bind(&alert.message)
            .bind(alert.read)
            .bind(alert.created_at.timestamp_millis())
            .bind(event_id)
            .bind(CALENDAR_ALERT_TYPE);
        if let Some(prefix) = scope_prefix(scope) {
            query = query.bind(prefix).bind(prefix);
        }

        let result = query.execute(self.db.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_calendar_alert(
        &self,
        calendar_event_id: &str,
        scope: DedupScope,
    ) -> Result<Option<DomainAlert>> {
        let sql = format!(
            r#"
            SELECT id, baby_id, alert_type, calendar_event_id, title, message, is_read, created_at_millis
            FROM alerts
            WHERE calendar_event_id = ? AND alert_type = ? {}
            LIMIT 1
            "#,
            scope_predicate(scope)
        );

        let mut query = sqlx::query(&sql)
            .bind(calendar_event_id)
            .bind(CALENDAR_ALERT_TYPE);
        if let Some(prefix) = scope_prefix(scope) {
            query = query.bind(prefix).bind(prefix);
        }

        let row = query.fetch_optional(self.db.pool()).await?;
        row.as_ref().map(alert_from_row).transpose()
    }

    async fn list_alerts_for_baby(&self, baby_id: &str) -> Result<Vec<DomainAlert>> {
        let rows = sqlx::query(
            r#"
            SELECT id, baby_id, alert_type, calendar_event_id, title, message, is_read, created_at_millis
            FROM alerts
            WHERE baby_id = ?
            ORDER BY created_at_millis DESC, ROWID DESC
            "#,
        )
        .bind(baby_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(alert_from_row).collect()
    }

    async fn mark_alert_read(&self, alert_id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE alerts SET is_read = 1 WHERE id = ?")
            .bind(alert_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
