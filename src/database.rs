// Module Database contains the suggestion store and the connection it runs on

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{mysql::MySqlConnectOptions, MySql, MySqlPool, Pool};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    error::StoreError,
    suggestion::{SuggestionRow, ValidSuggestion},
};

const CREATE_SUGGESTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS suggestions (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    song1 TEXT NOT NULL,
    artist1 TEXT NOT NULL,
    song2 TEXT NULL,
    artist2 TEXT NULL,
    suggester_name TEXT NOT NULL,
    suggester_email TEXT NULL,
    reason TEXT NULL,
    `timestamp` TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    likes INT UNSIGNED NOT NULL DEFAULT 0,
    INDEX suggestions_timestamp (`timestamp`)
)"#;

const SELECT_COLUMNS: &str = "SELECT id, song1, artist1, song2, artist2, suggester_name, \
     suggester_email, reason, `timestamp`, likes FROM suggestions";

/// Hands out the process wide pool. Nothing connects until the first
/// `acquire`, and a missing URL fails there without touching the network.
#[derive(Debug, Default)]
pub struct ConnectionProvider {
    url: Option<String>,
    pool: OnceCell<Pool<MySql>>,
}

impl ConnectionProvider {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            pool: OnceCell::new(),
        }
    }

    pub async fn acquire(&self) -> Result<&Pool<MySql>, StoreError> {
        let url = self.url.as_deref().ok_or(StoreError::Configuration)?;

        self.pool
            .get_or_try_init(|| async {
                let pool = connect_to_database(url).await?;
                sqlx::query(CREATE_SUGGESTIONS).execute(&pool).await?;
                info!("Connected to the suggestion store");
                Ok::<_, StoreError>(pool)
            })
            .await
    }

    /// Closes the pool if one was ever opened.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

pub async fn connect_to_database(url: &str) -> Result<Pool<MySql>, sqlx::Error> {
    let opts: MySqlConnectOptions = url.parse()?;
    MySqlPool::connect_with(opts).await
}

/// Durable home of suggestions. Rows are created once and never changed.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Inserts one suggestion with `likes = 0` and the current time, returning
    /// the stored row(s).
    async fn insert(&self, suggestion: ValidSuggestion) -> Result<Vec<SuggestionRow>, StoreError>;

    /// Every suggestion, newest first.
    async fn list(&self) -> Result<Vec<SuggestionRow>, StoreError>;

    /// Releases whatever the store holds open. Called once on shutdown.
    async fn close(&self) {}
}

pub struct MySqlStore {
    provider: ConnectionProvider,
}

impl MySqlStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

}

#[async_trait]
impl SuggestionStore for MySqlStore {
    async fn insert(&self, suggestion: ValidSuggestion) -> Result<Vec<SuggestionRow>, StoreError> {
        let pool = self.provider.acquire().await?;

        let result = sqlx::query(
            "INSERT INTO suggestions \
             (song1, artist1, song2, artist2, suggester_name, suggester_email, reason, `timestamp`, likes) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&suggestion.song1)
        .bind(&suggestion.artist1)
        .bind(&suggestion.song2)
        .bind(&suggestion.artist2)
        .bind(&suggestion.suggester_name)
        .bind(&suggestion.suggester_email)
        .bind(&suggestion.reason)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        let id = result.last_insert_id();
        debug!(id, "inserted suggestion");

        let rows = sqlx::query_as::<_, SuggestionRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn list(&self) -> Result<Vec<SuggestionRow>, StoreError> {
        let pool = self.provider.acquire().await?;

        let rows = sqlx::query_as::<_, SuggestionRow>(&format!("{SELECT_COLUMNS} ORDER BY `timestamp` DESC"))
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn close(&self) {
        self.provider.close().await;
        info!("Closed the suggestion store");
    }
}

/// Store kept in process memory, for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<SuggestionRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows, ids included.
    pub fn with_rows(rows: Vec<SuggestionRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn insert(&self, suggestion: ValidSuggestion) -> Result<Vec<SuggestionRow>, StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let row = SuggestionRow::from_valid(id, suggestion, Utc::now());
        rows.push(row.clone());
        Ok(vec![row])
    }

    async fn list(&self) -> Result<Vec<SuggestionRow>, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }
}
