use crate::domain::{models::session::OrganizerSession, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn insert(&self, session: &OrganizerSession) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO organizer_sessions (token_hash, organizer_id, family_id, generation, expires_at, revoked_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
        .bind(&session.token_hash)
        .bind(&session.organizer_id)
        .bind(&session.family_id)
        .bind(session.generation)
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<OrganizerSession>, AppError> {
        sqlx::query_as::<_, OrganizerSession>(
            "SELECT token_hash, organizer_id, family_id, generation, expires_at, revoked_at, created_at
             FROM organizer_sessions WHERE token_hash = $1"
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE organizer_sessions SET revoked_at = $1 WHERE token_hash = $2 AND revoked_at IS NULL"
        )
        .bind(at)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_family(&self, family_id: &str, at: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE organizer_sessions SET revoked_at = $1 WHERE family_id = $2 AND revoked_at IS NULL"
        )
        .bind(at)
        .bind(family_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
