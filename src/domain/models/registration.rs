use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::invitee::normalize_email;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub invite_token: Option<String>,
    pub quantity: i32,
    pub payment_reference: Option<String>,
    pub status: String, // CONFIRMED
    pub created_at: DateTime<Utc>,
}

pub struct NewRegistrationParams {
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub invite_token: Option<String>,
    pub quantity: i32,
    pub paid: bool,
}

impl Registration {
    pub fn new(params: NewRegistrationParams) -> Self {
        // Stand-in for a payment gateway charge id.
        let payment_reference = params.paid.then(|| format!("mock_{}", Uuid::new_v4().simple()));

        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            name: params.name.trim().to_string(),
            email: normalize_email(&params.email),
            invite_token: params.invite_token,
            quantity: params.quantity,
            payment_reference,
            status: "CONFIRMED".to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: String,
    pub event_id: String,
    pub invitee_id: String,
    pub referrer_email: String,
    pub referred_email: String,
    pub registration_id: String,
    pub created_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(event_id: String, invitee_id: String, referrer_email: String, registration: &Registration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            invitee_id,
            referrer_email,
            referred_email: registration.email.clone(),
            registration_id: registration.id.clone(),
            created_at: Utc::now(),
        }
    }
}
