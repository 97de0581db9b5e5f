use crate::domain::{models::invitee::Invitee, ports::InviteeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresInviteeRepo {
    pool: PgPool,
}

impl PostgresInviteeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteeRepository for PostgresInviteeRepo {
    async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError> {
        sqlx::query_as::<_, Invitee>(
            "INSERT INTO invitees (id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at",
        )
            .bind(&invitee.id)
            .bind(&invitee.event_id)
            .bind(&invitee.email)
            .bind(&invitee.invite_token)
            .bind(invitee.has_accessed)
            .bind(invitee.accessed_at)
            .bind(invitee.referred_count)
            .bind(invitee.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE invite_token = $1",
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token_and_event(&self, token: &str, event_id: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE invite_token = $1 AND event_id = $2",
        )
            .bind(token)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE event_id = $1 AND email = $2",
        )
            .bind(event_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE event_id = $1 ORDER BY created_at",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_accessed(&self, id: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invitees SET has_accessed = $1, accessed_at = $2 WHERE id = $3 AND accessed_at IS NULL",
        )
            .bind(true)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_referred(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE invitees SET referred_count = referred_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invitees WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invitee not found".into()));
        }
        Ok(())
    }
}
