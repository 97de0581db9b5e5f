use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

pub const SESSION_AUDIENCE: &str = "events-dashboard";
pub const ACCESS_TTL_MINUTES: i64 = 15;
pub const REFRESH_TTL_DAYS: i64 = 7;

/// Access-token claims. `sid` names the session family the token was minted from.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub sid: String,
    pub csrf: String,
}

/// A stored refresh token. Rotation revokes the row instead of deleting it,
/// which is what lets a replayed token be detected.
#[derive(Debug, FromRow, Clone)]
pub struct OrganizerSession {
    pub token_hash: String,
    pub organizer_id: String,
    pub family_id: String,
    pub generation: i32,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrganizerSession {
    pub fn new(token_hash: String, organizer_id: String, family_id: String, generation: i32) -> Self {
        let now = Utc::now();
        Self {
            token_hash,
            organizer_id,
            family_id,
            generation,
            expires_at: now + Duration::days(REFRESH_TTL_DAYS),
            revoked_at: None,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Raw credentials handed to the client once; only the refresh token's
/// digest is persisted.
#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}
