use crate::domain::{
    models::registration::{Registration, Referral},
    ports::{RegistrationRepository, ReferralRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            r#"INSERT INTO registrations (
                id, event_id, name, email, invite_token, quantity, payment_reference, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#
        )
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.name)
            .bind(&registration.email)
            .bind(&registration.invite_token)
            .bind(registration.quantity)
            .bind(&registration.payment_reference)
            .bind(&registration.status)
            .bind(registration.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY created_at",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

pub struct PostgresReferralRepo {
    pool: PgPool,
}

impl PostgresReferralRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferralRepository for PostgresReferralRepo {
    async fn create(&self, referral: &Referral) -> Result<Referral, AppError> {
        sqlx::query_as::<_, Referral>(
            r#"INSERT INTO referrals (
                id, event_id, invitee_id, referrer_email, referred_email, registration_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *"#
        )
            .bind(&referral.id)
            .bind(&referral.event_id)
            .bind(&referral.invitee_id)
            .bind(&referral.referrer_email)
            .bind(&referral.referred_email)
            .bind(&referral.registration_id)
            .bind(referral.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM referrals WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
