use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, owner_id, title, date, time, location, bio, agenda, qa,
                image_url, status, has_tickets, requires_tickets, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.owner_id)
            .bind(&event.title)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.bio)
            .bind(&event.agenda)
            .bind(&event.qa)
            .bind(&event.image_url)
            .bind(&event.status)
            .bind(event.has_tickets)
            .bind(event.requires_tickets)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_private(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = $1 AND status = 'private'",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE owner_id = $1 ORDER BY date, time",
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, date=$2, time=$3, location=$4, bio=$5, agenda=$6, qa=$7,
                image_url=$8, status=$9, has_tickets=$10, requires_tickets=$11, updated_at=$12
               WHERE id=$13 AND owner_id=$14 RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.bio)
            .bind(&event.agenda)
            .bind(&event.qa)
            .bind(&event.image_url)
            .bind(&event.status)
            .bind(event.has_tickets)
            .bind(event.requires_tickets)
            .bind(event.updated_at)
            .bind(&event.id)
            .bind(&event.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Dependents first so foreign keys hold; invitees stay.
        sqlx::query("DELETE FROM referrals WHERE event_id = $1 AND EXISTS (SELECT 1 FROM events WHERE id = $2 AND owner_id = $3)")
            .bind(id)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM registrations WHERE event_id = $1 AND EXISTS (SELECT 1 FROM events WHERE id = $2 AND owner_id = $3)")
            .bind(id)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)
    }
}
