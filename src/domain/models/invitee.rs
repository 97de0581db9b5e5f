use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Invitee {
    pub id: String,
    pub event_id: String,
    pub email: String,
    pub invite_token: String,
    pub has_accessed: bool,
    pub accessed_at: Option<DateTime<Utc>>,
    pub referred_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Invitee {
    pub fn new(event_id: String, email: &str) -> Self {
        let invite_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            email: normalize_email(email),
            invite_token,
            has_accessed: false,
            accessed_at: None,
            referred_count: 0,
            created_at: Utc::now(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
