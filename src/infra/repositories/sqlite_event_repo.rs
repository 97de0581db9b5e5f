use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, owner_id, title, date, time, location, bio, agenda, qa,
                image_url, status, has_tickets, requires_tickets, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "SELECT * FROM events WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_private(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = ? AND status = 'private'",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE owner_id = ? ORDER BY date, time",
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=?, date=?, time=?, location=?, bio=?, agenda=?, qa=?,
                image_url=?, status=?, has_tickets=?, requires_tickets=?, updated_at=?
               WHERE id=? AND owner_id=? RETURNING *"#
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
        sqlx::query("DELETE FROM referrals WHERE event_id = ? AND EXISTS (SELECT 1 FROM events WHERE id = ? AND owner_id = ?)")
            .bind(id)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM registrations WHERE event_id = ? AND EXISTS (SELECT 1 FROM events WHERE id = ? AND owner_id = ?)")
            .bind(id)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM events WHERE id = ? AND owner_id = ?")
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
