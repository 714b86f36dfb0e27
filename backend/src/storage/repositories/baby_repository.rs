use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::DomainBaby;
use crate::storage::connection::DbConnection;
use crate::storage::traits::BabyStorage;

/// SQLite repository for baby profiles
#[derive(Clone)]
pub struct BabyRepository {
    db: DbConnection,
}

impl BabyRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn baby_from_row(row: &SqliteRow) -> DomainBaby {
    DomainBaby {
        id: row.get("id"),
        name: row.get("name"),
        birthdate: row.get("birthdate"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl BabyStorage for BabyRepository {
    async fn store_baby(&self, baby: &DomainBaby) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO babies (id, name, birthdate, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&baby.id)
        .bind(&baby.name)
        .bind(&baby.birthdate)
        .bind(&baby.created_at)
        .bind(&baby.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_baby(&self, baby_id: &str) -> Result<Option<DomainBaby>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, birthdate, created_at, updated_at
            FROM babies
            WHERE id = ?
            "#,
        )
        .bind(baby_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(baby_from_row))
    }

    async fn list_babies(&self) -> Result<Vec<DomainBaby>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, birthdate, created_at, updated_at
            FROM babies
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(baby_from_row).collect())
    }

    async fn update_baby(&self, baby: &DomainBaby) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE babies
            SET name = ?, birthdate = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&baby.name)
        .bind(&baby.birthdate)
        .bind(&baby.updated_at)
        .bind(&baby.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_baby(&self, baby_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM alerts WHERE baby_id = ?")
            .bind(baby_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM calendar_events WHERE baby_id = ?")
            .bind(baby_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM babies WHERE id = ?")
            .bind(baby_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> BabyRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        BabyRepository::new(db)
    }

    fn test_baby(id: &str, name: &str) -> DomainBaby {
        DomainBaby {
            id: id.to_string(),
            name: name.to_string(),
            birthdate: "2025-01-15".to_string(),
            created_at: "2025-01-16T08:00:00+00:00".to_string(),
            updated_at: "2025-01-16T08:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_baby() {
        let repo = setup_test().await;
        let baby = test_baby("baby::1", "Mia");

        repo.store_baby(&baby).await.expect("Failed to store baby");

        let fetched = repo.get_baby("baby::1").await.expect("Failed to get baby");
        assert_eq!(fetched, Some(baby));
        assert!(repo.get_baby("baby::missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_babies_ordered_by_name() {
        let repo = setup_test().await;
        repo.store_baby(&test_baby("baby::1", "Noah")).await.unwrap();
        repo.store_baby(&test_baby("baby::2", "Ava")).await.unwrap();

        let babies = repo.list_babies().await.expect("Failed to list babies");
        let names: Vec<&str> = babies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Ava", "Noah"]);
    }

    #[tokio::test]
    async fn test_delete_baby_removes_events_and_alerts() {
        let repo = setup_test().await;
        repo.store_baby(&test_baby("baby::1", "Mia")).await.unwrap();

        sqlx::query(
            "INSERT INTO calendar_events (id, baby_id, title, date_millis, created_at, updated_at) VALUES ('event::1', 'baby::1', 'Checkup', 0, 'x', 'x')",
        )
        .execute(repo.db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO alerts (id, baby_id, alert_type, calendar_event_id, title, message, created_at_millis) VALUES ('alert::1', 'baby::1', 'calendar', 'event::1', 't', 'm', 0)",
        )
        .execute(repo.db.pool())
        .await
        .unwrap();

        assert!(repo.delete_baby("baby::1").await.expect("Failed to delete baby"));
        assert!(!repo.delete_baby("baby::1").await.unwrap());

        let remaining: i64 = sqlx::query(
            "SELECT (SELECT COUNT(*) FROM calendar_events) + (SELECT COUNT(*) FROM alerts) AS n",
        )
        .fetch_one(repo.db.pool())
        .await
        .unwrap()
        .get("n");
        assert_eq!(remaining, 0);
    }
}
