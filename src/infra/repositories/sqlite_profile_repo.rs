use crate::domain::{models::organizer::OrganizerProfile, ports::OrganizerProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerProfileRepository for SqliteProfileRepo {
    async fn find_by_organizer(&self, organizer_id: &str) -> Result<Option<OrganizerProfile>, AppError> {
        sqlx::query_as::<_, OrganizerProfile>(
            "SELECT organizer_id, display_name, bio, avatar_url, website, updated_at FROM organizer_profiles WHERE organizer_id = ?",
        )
            .bind(organizer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, profile: &OrganizerProfile) -> Result<OrganizerProfile, AppError> {
        sqlx::query_as::<_, OrganizerProfile>(
            r#"INSERT INTO organizer_profiles (organizer_id, display_name, bio, avatar_url, website, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(organizer_id) DO UPDATE SET
                display_name = excluded.display_name,
                bio = excluded.bio,
                avatar_url = excluded.avatar_url,
                website = excluded.website,
                updated_at = excluded.updated_at
            RETURNING organizer_id, display_name, bio, avatar_url, website, updated_at"#
        )
            .bind(&profile.organizer_id)
            .bind(&profile.display_name)
            .bind(&profile.bio)
            .bind(&profile.avatar_url)
            .bind(&profile.website)
            .bind(profile.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
