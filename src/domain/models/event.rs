use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Public,
    Published,
    Private,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Public => "public",
            EventStatus::Published => "published",
            EventStatus::Private => "private",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "public" => Ok(EventStatus::Public),
            "published" => Ok(EventStatus::Published),
            "private" => Ok(EventStatus::Private),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(format!("Invalid event status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub bio: String,
    pub agenda: String,
    pub qa: String,
    pub image_url: Option<String>,
    pub status: String,
    pub has_tickets: bool,
    pub requires_tickets: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub owner_id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub bio: String,
    pub agenda: String,
    pub qa: String,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub has_tickets: bool,
    pub requires_tickets: bool,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            title: params.title,
            date: params.date,
            time: params.time,
            location: params.location,
            bio: params.bio,
            agenda: params.agenda,
            qa: params.qa,
            image_url: params.image_url,
            status: params.status.as_str().to_string(),
            has_tickets: params.has_tickets,
            requires_tickets: params.requires_tickets,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rows with an unknown status are treated as drafts.
    pub fn status(&self) -> EventStatus {
        self.status.parse().unwrap_or_else(|e| {
            warn!("Event {}: {}; treating as draft", self.id, e);
            EventStatus::Draft
        })
    }

    pub fn is_private(&self) -> bool {
        self.status() == EventStatus::Private
    }
}
