//! SQLite-backed user store.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Pool, Sqlite};

use crate::{NewUser, StoreError, StoreResult, User, UserStore};

/// Target schema. Additive only; existing data is left untouched.
const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Database row for User.
#[derive(Debug, FromRow)]
struct UserRow {
    uid: String,
    name: String,
    email: String,
    created_at: String,
    updated_at: String,
}

/// Parses a stored RFC 3339 timestamp, falling back to the current time.
/// A row that trips the fallback is corrupt; the warning makes it visible.
fn parse_timestamp(value: &str, column: &'static str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(column, error = %e, "Unparseable timestamp in users row");
            chrono::Utc::now()
        })
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            uid: row.uid,
            name: row.name,
            email: row.email,
            created_at: parse_timestamp(&row.created_at, "created_at"),
            updated_at: parse_timestamp(&row.updated_at, "updated_at"),
        }
    }
}

/// User store backed by a SQLite connection pool.
pub struct SqliteUserStore {
    pool: Pool<Sqlite>,
}

impl SqliteUserStore {
    /// Creates a store over a lazily-connecting pool. No I/O happens here;
    /// call [`init`](Self::init) to verify the database at startup.
    pub fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Verifies the database with a round-trip and syncs the schema.
    pub async fn init(&self) -> StoreResult<()> {
        self.ping().await?;

        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        tracing::debug!("Schema sync complete");

        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let now = chrono::Utc::now().to_rfc3339();

        // The conflict target is the unique uid column; the database
        // serializes concurrent writers, so no read-then-write is needed.
        // created_at survives the conflict branch.
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (uid, name, email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(uid) DO UPDATE SET
                 name = excluded.name,
                 email = excluded.email,
                 updated_at = excluded.updated_at
             RETURNING uid, name, email, created_at, updated_at",
        )
        .bind(&user.uid)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(User::from(row))
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT uid, name, email, created_at, updated_at
             FROM users
             WHERE uid = ?",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT uid, name, email, created_at, updated_at
             FROM users
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// Single connection so every query sees the same in-memory database.
    async fn memory_backed_store() -> SqliteUserStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let store = SqliteUserStore { pool };
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = memory_backed_store().await;

        let created = store
            .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(created.uid, "u1");
        assert_eq!(created.name, "Alice");

        let updated = store
            .upsert_user(NewUser::new("u1", "Alice2", "a2@x.com"))
            .await
            .unwrap();
        assert_eq!(updated.uid, "u1");
        assert_eq!(updated.name, "Alice2");
        assert_eq!(updated.email, "a2@x.com");
        assert_eq!(updated.created_at, created.created_at);

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = memory_backed_store().await;

        let first = store
            .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
            .await
            .unwrap();
        let second = store
            .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
            .await
            .unwrap();

        assert_eq!(first.uid, second.uid);
        assert_eq!(first.name, second.name);
        assert_eq!(first.email, second.email);

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_uids_create_distinct_rows() {
        let store = memory_backed_store().await;

        store
            .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
            .await
            .unwrap();
        store
            .upsert_user(NewUser::new("u2", "Bob", "b@x.com"))
            .await
            .unwrap();

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].uid, "u1");
        assert_eq!(all[1].uid, "u2");
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let store = memory_backed_store().await;

        assert!(store.get_user("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_upserts_single_row() {
        let store = Arc::new(memory_backed_store().await);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .upsert_user(NewUser::new(
                        "race",
                        format!("writer-{i}"),
                        format!("w{i}@x.com"),
                    ))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].name.starts_with("writer-"));
    }

    #[tokio::test]
    async fn test_unreachable_database_surfaces_errors() {
        // The pool connects lazily, so a bad path only shows up when the
        // first operation runs. Every call must error, never panic.
        let store = SqliteUserStore::connect("sqlite:/nonexistent_dir/users.db").unwrap();

        assert!(store.init().await.is_err());
        assert!(store.ping().await.is_err());
        assert!(
            store
                .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
                .await
                .is_err()
        );
        assert!(store.get_user("u1").await.is_err());
    }

    #[test]
    fn test_parse_timestamp_fallback() {
        let instant = chrono::Utc::now();
        let parsed = parse_timestamp(&instant.to_rfc3339(), "created_at");
        assert_eq!(parsed, instant);

        // Corrupt values fall back instead of panicking.
        let fallback = parse_timestamp("not-a-date", "created_at");
        assert!(fallback >= instant);
    }

    #[tokio::test]
    async fn test_init_is_reentrant() {
        let store = memory_backed_store().await;

        // A second sync must not disturb existing rows.
        store
            .upsert_user(NewUser::new("u1", "Alice", "a@x.com"))
            .await
            .unwrap();
        store.init().await.unwrap();

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
