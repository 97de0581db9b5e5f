use crate::domain::{models::organizer::Organizer, ports::OrganizerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOrganizerRepo {
    pool: SqlitePool,
}

impl SqliteOrganizerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerRepository for SqliteOrganizerRepo {
    async fn create(&self, organizer: &Organizer) -> Result<Organizer, AppError> {
        sqlx::query_as::<_, Organizer>(
            "INSERT INTO organizers (id, username, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING id, username, password_hash, created_at",
        )
            .bind(&organizer.id)
            .bind(&organizer.username)
            .bind(&organizer.password_hash)
            .bind(organizer.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Organizer>, AppError> {
        sqlx::query_as::<_, Organizer>(
            "SELECT id, username, password_hash, created_at FROM organizers WHERE username = ?",
        )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>, AppError> {
        sqlx::query_as::<_, Organizer>(
            "SELECT id, username, password_hash, created_at FROM organizers WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
