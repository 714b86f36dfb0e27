use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::millis_to_utc;
use crate::domain::models::{DomainCalendarEvent, EventFilter};
use crate::storage::connection::DbConnection;
use crate::storage::traits::CalendarEventStorage;

const SELECT_EVENT_WITH_BABY: &str = r#"
    SELECT e.id, e.baby_id, b.name AS baby_name, e.title, e.description,
           e.date_millis, e.time, e.reminder, e.completed, e.created_at, e.updated_at
    FROM calendar_events e
    LEFT JOIN babies b ON b.id = e.baby_id
"#;

/// SQLite repository for calendar events
#[derive(Clone)]
pub struct CalendarEventRepository {
    db: DbConnection,
}

impl CalendarEventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn event_from_row(row: &SqliteRow) -> Result<DomainCalendarEvent> {
    Ok(DomainCalendarEvent {
        id: row.get("id"),
        baby_id: row.get("baby_id"),
        baby_name: row.get("baby_name"),
        title: row.get("title"),
        description: row.get("description"),
        date: millis_to_utc(row.get("date_millis"))?,
        time: row.get("time"),
        reminder: row.get("reminder"),
        completed: row.get("completed"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl CalendarEventStorage for CalendarEventRepository {
    async fn store_event(&self, event: &DomainCalendarEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events
                (id, baby_id, title, description, date_millis, time, reminder, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.baby_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date.timestamp_millis())
        .bind(&event.time)
        .bind(event.reminder)
        .bind(event.completed)
        .bind(&event.created_at)
        .bind(&event.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<DomainCalendarEvent>> {
        let sql = format!("{} WHERE e.id = ?", SELECT_EVENT_WITH_BABY);
        let row = sqlx::query(&sql)
            .bind(event_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn list_events_for_baby(
        &self,
        baby_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<DomainCalendarEvent>> {
        let sql = format!(
            r#"{}
            WHERE e.baby_id = ?
              AND (? IS NULL OR e.date_millis >= ?)
              AND (? IS NULL OR e.date_millis < ?)
            ORDER BY e.date_millis ASC
            "#,
            SELECT_EVENT_WITH_BABY
        );
        let start_millis = start.map(|d| d.timestamp_millis());
        let end_millis = end.map(|d| d.timestamp_millis());

        let rows = sqlx::query(&sql)
            .bind(baby_id)
            .bind(start_millis)
            .bind(start_millis)
            .bind(end_millis)
            .bind(end_millis)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(event_from_row).collect()
    }

    async fn find_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: EventFilter,
    ) -> Result<Vec<DomainCalendarEvent>> {
        // No ORDER BY: callers process events in whatever order the store yields
        let sql = format!(
            r#"{}
            WHERE e.date_millis >= ?
              AND e.date_millis < ?
              AND (? IS NULL OR e.reminder = ?)
              AND (? IS NULL OR e.completed = ?)
            "#,
            SELECT_EVENT_WITH_BABY
        );

        let rows = sqlx::query(&sql)
            .bind(start.timestamp_millis())
            .bind(end.timestamp_millis())
            .bind(filter.reminder)
            .bind(filter.reminder)
            .bind(filter.completed)
            .bind(filter.completed)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(event_from_row).collect()
    }

    async fn update_event(&self, event: &DomainCalendarEvent) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE calendar_events
            SET title = ?, description = ?, date_millis = ?, time = ?,
                reminder = ?, completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date.timestamp_millis())
        .bind(&event.time)
        .bind(event.reminder)
        .bind(event.completed)
        .bind(&event.updated_at)
        .bind(&event.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = ?")
            .bind(event_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
