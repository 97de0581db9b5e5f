use crate::domain::{models::invitee::Invitee, ports::InviteeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteInviteeRepo {
    pool: SqlitePool,
}

impl SqliteInviteeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteeRepository for SqliteInviteeRepo {
    async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError> {
        sqlx::query_as::<_, Invitee>(
            "INSERT INTO invitees (id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at",
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
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE invite_token = ?",
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token_and_event(&self, token: &str, event_id: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE invite_token = ? AND event_id = ?",
        )
            .bind(token)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE event_id = ? AND email = ?",
        )
            .bind(event_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>(
            "SELECT id, event_id, email, invite_token, has_accessed, accessed_at, referred_count, created_at FROM invitees WHERE event_id = ? ORDER BY created_at",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_accessed(&self, id: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invitees SET has_accessed = ?, accessed_at = ? WHERE id = ? AND accessed_at IS NULL",
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
        sqlx::query("UPDATE invitees SET referred_count = referred_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invitees WHERE id = ? AND event_id = ?")
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
