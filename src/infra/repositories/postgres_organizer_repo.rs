use crate::domain::{models::organizer::Organizer, ports::OrganizerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOrganizerRepo {
    pool: PgPool,
}

impl PostgresOrganizerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerRepository for PostgresOrganizerRepo {
    async fn create(&self, organizer: &Organizer) -> Result<Organizer, AppError> {
        sqlx::query_as::<_, Organizer>(
            "INSERT INTO organizers (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4) RETURNING id, username, password_hash, created_at",
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
            "SELECT id, username, password_hash, created_at FROM organizers WHERE username = $1",
        )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>, AppError> {
        sqlx::query_as::<_, Organizer>(
            "SELECT id, username, password_hash, created_at FROM organizers WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
