pub mod sqlite_session_repo;
pub mod sqlite_event_repo;
pub mod sqlite_invitee_repo;
pub mod sqlite_organizer_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_registration_repo;

pub mod postgres_session_repo;
pub mod postgres_event_repo;
pub mod postgres_invitee_repo;
pub mod postgres_organizer_repo;
pub mod postgres_profile_repo;
pub mod postgres_registration_repo;
