use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database and schema if needed
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        // In-memory databases vanish with their last connection, so never
        // let the pool reap idle ones.
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(url)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        // A single connection keeps shared-cache table locks out of tests
        Self::new(&db_url, 1).await
    }

    /// Initialize a file-backed test database whose pool holds several
    /// connections. The caller removes the returned path when done.
    #[cfg(test)]
    pub async fn init_test_file(max_connections: u32) -> Result<(Self, std::path::PathBuf)> {
        let path = std::env::temp_dir().join(format!("babycare_test_{}.db", uuid::Uuid::new_v4()));
        let db_url = format!("sqlite:{}", path.display());
        Ok((Self::new(&db_url, max_connections).await?, path))
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS babies (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                birthdate TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // `date_millis` is epoch milliseconds (UTC) so range queries are exact
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS calendar_events (
                id TEXT PRIMARY KEY,
                baby_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                date_millis INTEGER NOT NULL,
                time TEXT,
                reminder INTEGER NOT NULL DEFAULT 1,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_calendar_events_baby_date
            ON calendar_events(baby_id, date_millis);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id TEXT PRIMARY KEY,
                baby_id TEXT NOT NULL,
                alert_type TEXT NOT NULL,
                calendar_event_id TEXT,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at_millis INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_alerts_event
            ON alerts(calendar_event_id, alert_type);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_alerts_baby_created
            ON alerts(baby_id, created_at_millis DESC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Failed to list tables");
        let tables: Vec<String> = rows.iter().map(|row| row.get("name")).collect();

        assert!(tables.contains(&"babies".to_string()));
        assert!(tables.contains(&"calendar_events".to_string()));
        assert!(tables.contains(&"alerts".to_string()));
    }

    #[tokio::test]
    async fn test_schema_setup_is_repeatable() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        DbConnection::setup_schema(db.pool())
            .await
            .expect("Second schema setup should be a no-op");
    }

    #[tokio::test]
    async fn test_test_databases_are_isolated() {
        let first = DbConnection::init_test().await.unwrap();
        let second = DbConnection::init_test().await.unwrap();

        sqlx::query(
            "INSERT INTO babies (id, name, birthdate, created_at, updated_at) VALUES ('baby::1', 'A', '2024-01-01', 'x', 'x')",
        )
        .execute(first.pool())
        .await
        .unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM babies")
            .fetch_one(second.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }
}
