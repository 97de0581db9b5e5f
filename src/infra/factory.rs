use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, Repositories};
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo,
    postgres_invitee_repo::PostgresInviteeRepo, postgres_organizer_repo::PostgresOrganizerRepo,
    postgres_profile_repo::PostgresProfileRepo, postgres_session_repo::PostgresSessionRepo,
    postgres_registration_repo::{PostgresRegistrationRepo, PostgresReferralRepo},
    sqlite_event_repo::SqliteEventRepo,
    sqlite_invitee_repo::SqliteInviteeRepo, sqlite_organizer_repo::SqliteOrganizerRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_session_repo::SqliteSessionRepo,
    sqlite_registration_repo::{SqliteRegistrationRepo, SqliteReferralRepo},
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse()
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid Postgres URL: {}", e)))?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        sqlite_repositories(pool)
    };

    AppState::assemble(config.clone(), repos)
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        organizer_repo: Arc::new(SqliteOrganizerRepo::new(pool.clone())),
        profile_repo: Arc::new(SqliteProfileRepo::new(pool.clone())),
        event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
        invitee_repo: Arc::new(SqliteInviteeRepo::new(pool.clone())),
        registration_repo: Arc::new(SqliteRegistrationRepo::new(pool.clone())),
        referral_repo: Arc::new(SqliteReferralRepo::new(pool.clone())),
        session_repo: Arc::new(SqliteSessionRepo::new(pool)),
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        organizer_repo: Arc::new(PostgresOrganizerRepo::new(pool.clone())),
        profile_repo: Arc::new(PostgresProfileRepo::new(pool.clone())),
        event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
        invitee_repo: Arc::new(PostgresInviteeRepo::new(pool.clone())),
        registration_repo: Arc::new(PostgresRegistrationRepo::new(pool.clone())),
        referral_repo: Arc::new(PostgresReferralRepo::new(pool.clone())),
        session_repo: Arc::new(PostgresSessionRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
