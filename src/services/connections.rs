use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the connection store
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// State of a directed connection edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
}

/// Outcome of a connection request, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestOutcome {
    /// Request stored, waiting for the other side
    Pending,
    /// Both sides requested each other; the edge is accepted
    Connected,
}

/// PostgreSQL store for the student connection graph.
///
/// Edges are directed rows: a pending row is an open request from
/// `user_id` to `target_user_id`; an accepted edge is stored as one row
/// per direction so membership lookups stay single-predicate.
pub struct ConnectionStore {
    pool: PgPool,
}

impl ConnectionStore {
    /// Create a new connection store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, ConnectionError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new connection store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, ConnectionError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record a connection request from `user_id` to `target_user_id`.
    ///
    /// A mutual pending request collapses to an accepted edge on both
    /// sides. Repeating a request is idempotent and never downgrades an
    /// accepted edge.
    pub async fn request(
        &self,
        user_id: i64,
        target_user_id: i64,
    ) -> Result<RequestOutcome, ConnectionError> {
        if user_id == target_user_id {
            return Err(ConnectionError::InvalidInput(
                "cannot connect a user to themselves".to_string(),
            ));
        }

        // Does the other side already have an open or accepted edge to us?
        let reverse: Option<ConnectionStatus> = sqlx::query_scalar(
            r#"
            SELECT status
            FROM connections
            WHERE user_id = $1 AND target_user_id = $2
            "#,
        )
        .bind(target_user_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match reverse {
            Some(_) => {
                // Mutual interest: accept both directions
                self.upsert(target_user_id, user_id, ConnectionStatus::Accepted)
                    .await?;
                self.upsert(user_id, target_user_id, ConnectionStatus::Accepted)
                    .await?;

                tracing::debug!("Connection accepted: {} <-> {}", user_id, target_user_id);
                Ok(RequestOutcome::Connected)
            }
            None => {
                let query = r#"
                    INSERT INTO connections (user_id, target_user_id, status)
                    VALUES ($1, $2, 'pending')
                    ON CONFLICT (user_id, target_user_id) DO NOTHING
                "#;

                sqlx::query(query)
                    .bind(user_id)
                    .bind(target_user_id)
                    .execute(&self.pool)
                    .await?;

                tracing::debug!("Connection requested: {} -> {}", user_id, target_user_id);
                Ok(RequestOutcome::Pending)
            }
        }
    }

    /// Accept an incoming request from `target_user_id`.
    ///
    /// Returns false when no pending request from that user exists.
    pub async fn accept(
        &self,
        user_id: i64,
        target_user_id: i64,
    ) -> Result<bool, ConnectionError> {
        let query = r#"
            UPDATE connections
            SET status = 'accepted', updated_at = NOW()
            WHERE user_id = $1 AND target_user_id = $2 AND status = 'pending'
        "#;

        let result = sqlx::query(query)
            .bind(target_user_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // Mirror the edge so both sides see the connection
        self.upsert(user_id, target_user_id, ConnectionStatus::Accepted)
            .await?;

        tracing::debug!("Connection accepted: {} <-> {}", user_id, target_user_id);
        Ok(true)
    }

    /// Withdraw an outgoing pending request.
    ///
    /// Returns false when no pending request to that user exists.
    pub async fn cancel(
        &self,
        user_id: i64,
        target_user_id: i64,
    ) -> Result<bool, ConnectionError> {
        let query = r#"
            DELETE FROM connections
            WHERE user_id = $1 AND target_user_id = $2 AND status = 'pending'
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ids of everyone the user holds an accepted connection to
    pub async fn accepted_ids(&self, user_id: i64) -> Result<Vec<i64>, ConnectionError> {
        let query = r#"
            SELECT target_user_id
            FROM connections
            WHERE user_id = $1 AND status = 'accepted'
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("target_user_id")).collect())
    }

    /// Ids of users with an open request towards this user
    pub async fn incoming_pending(&self, user_id: i64) -> Result<Vec<i64>, ConnectionError> {
        let query = r#"
            SELECT user_id
            FROM connections
            WHERE target_user_id = $1 AND status = 'pending'
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }

    /// Ids this user has an open request towards
    pub async fn outgoing_pending(&self, user_id: i64) -> Result<Vec<i64>, ConnectionError> {
        let query = r#"
            SELECT target_user_id
            FROM connections
            WHERE user_id = $1 AND status = 'pending'
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("target_user_id")).collect())
    }

    /// Per-user connection statistics
    pub async fn stats(&self, user_id: i64) -> Result<ConnectionStats, ConnectionError> {
        let query = r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'accepted') as accepted,
                COUNT(*) FILTER (WHERE status = 'pending') as outgoing,
                MAX(updated_at) as last_change_at
            FROM connections
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;

        Ok(ConnectionStats {
            user_id,
            accepted: row.get("accepted"),
            outgoing: row.get("outgoing"),
            last_change_at: row.get("last_change_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, ConnectionError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Write one directed edge, overwriting the status of an existing row
    async fn upsert(
        &self,
        user_id: i64,
        target_user_id: i64,
        status: ConnectionStatus,
    ) -> Result<(), ConnectionError> {
        let query = r#"
            INSERT INTO connections (user_id, target_user_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, target_user_id)
            DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Statistics about a user's connection edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStats {
    pub user_id: i64,
    pub accepted: i64,
    pub outgoing: i64,
    pub last_change_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&RequestOutcome::Pending).unwrap(),
            r#""pending""#
        );
        assert_eq!(
            serde_json::to_string(&RequestOutcome::Connected).unwrap(),
            r#""connected""#
        );
    }

    #[test]
    fn test_connection_status_roundtrip() {
        let status: ConnectionStatus =
            serde_json::from_str(r#""accepted""#).unwrap();
        assert_eq!(status, ConnectionStatus::Accepted);
    }
}
