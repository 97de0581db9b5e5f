use crate::domain::models::{
    event::Event, invitee::Invitee, organizer::{Organizer, OrganizerProfile},
    registration::{Registration, Referral}, session::OrganizerSession,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    async fn create(&self, organizer: &Organizer) -> Result<Organizer, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Organizer>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>, AppError>;
}

#[async_trait]
pub trait OrganizerProfileRepository: Send + Sync {
    async fn find_by_organizer(&self, organizer_id: &str) -> Result<Option<OrganizerProfile>, AppError>;
    async fn upsert(&self, profile: &OrganizerProfile) -> Result<OrganizerProfile, AppError>;
}

/// Refresh-token store. Rows are revoked, never deleted, so replays stay visible.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &OrganizerSession) -> Result<(), AppError>;
    async fn find(&self, token_hash: &str) -> Result<Option<OrganizerSession>, AppError>;
    /// Revokes one live row. `false` when it was already revoked.
    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
    async fn revoke_family(&self, family_id: &str, at: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Only returns the event while its status is `private`.
    async fn find_private(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Removes the event with its registrations and referrals. Invitees are kept.
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InviteeRepository: Send + Sync {
    async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitee>, AppError>;
    async fn find_by_token_and_event(&self, token: &str, event_id: &str) -> Result<Option<Invitee>, AppError>;
    async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError>;
    /// Sets `has_accessed`/`accessed_at` only if `accessed_at` is still null.
    /// Returns whether this call performed the first write.
    async fn mark_accessed(&self, id: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
    async fn increment_referred(&self, id: &str) -> Result<(), AppError>;
    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ReferralRepository: Send + Sync {
    async fn create(&self, referral: &Referral) -> Result<Referral, AppError>;
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
}
