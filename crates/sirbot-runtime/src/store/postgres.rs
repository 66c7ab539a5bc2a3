//! PostgreSQL store over the `slack` schema.
//!
//! Tables are owned by the Slack metadata sync job; this store only appends to
//! `slack.messages` and reads `slack.channels` and `slack.users`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info, instrument};

use sirbot_core::{
    ArchivedMessage, ChannelRecord, PersistenceError, PersistenceGateway, PersistenceResult,
    StoredUser, UserProfile,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> sqlx::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::from_pool(pool))
    }

    /// Reuses an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> PersistenceError {
    PersistenceError::Backend(err.to_string())
}

#[async_trait]
impl PersistenceGateway for PgStore {
    #[instrument(skip_all, fields(id = %message.id))]
    async fn insert_message(&self, message: &ArchivedMessage) -> PersistenceResult<()> {
        let result = sqlx::query(
            r#"INSERT INTO slack.messages (id, text, "user", channel, raw, time)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(&message.id)
        .bind(&message.text)
        .bind(&message.sender_id)
        .bind(&message.channel_id)
        .bind(Json(&message.raw))
        .bind(message.timestamp)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!("Message already archived");
                Err(PersistenceError::DuplicateKey {
                    key: message.id.clone(),
                })
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn fetch_channel(&self, channel_id: &str) -> PersistenceResult<Option<ChannelRecord>> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT raw FROM slack.channels WHERE id = $1")
                .bind(channel_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        Ok(row.map(|(Json(raw),)| ChannelRecord {
            id: channel_id.to_string(),
            raw,
        }))
    }

    async fn fetch_user(&self, user_id: &str) -> PersistenceResult<Option<StoredUser>> {
        let row: Option<(Json<Value>, DateTime<Utc>)> =
            sqlx::query_as("SELECT raw, join_date FROM slack.users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        Ok(row.map(|(Json(raw), join_date)| StoredUser {
            profile: UserProfile(raw),
            join_date,
        }))
    }
}
