use std::sync::Arc;
use crate::domain::ports::{
    EventRepository, InviteeRepository, OrganizerProfileRepository, OrganizerRepository,
    ReferralRepository, RegistrationRepository, SessionRepository,
};
use crate::domain::services::{access_service::AccessService, session_service::SessionService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub profile_repo: Arc<dyn OrganizerProfileRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub invitee_repo: Arc<dyn InviteeRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub referral_repo: Arc<dyn ReferralRepository>,
    pub session_service: Arc<SessionService>,
    pub access_service: Arc<AccessService>,
}

/// Repository set for one storage backend; services are wired on top of it.
pub struct Repositories {
    pub organizer_repo: Arc<dyn OrganizerRepository>,
    pub profile_repo: Arc<dyn OrganizerProfileRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub invitee_repo: Arc<dyn InviteeRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub referral_repo: Arc<dyn ReferralRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
}

impl AppState {
    pub fn assemble(config: Config, repos: Repositories) -> Result<Self, crate::error::AppError> {
        let session_service = Arc::new(SessionService::new(
            repos.organizer_repo,
            repos.session_repo,
            &config,
        )?);
        let access_service = Arc::new(AccessService::new(
            repos.event_repo.clone(),
            repos.invitee_repo.clone(),
            repos.profile_repo.clone(),
            repos.registration_repo.clone(),
            repos.referral_repo.clone(),
        ));

        Ok(Self {
            config,
            profile_repo: repos.profile_repo,
            event_repo: repos.event_repo,
            invitee_repo: repos.invitee_repo,
            registration_repo: repos.registration_repo,
            referral_repo: repos.referral_repo,
            session_service,
            access_service,
        })
    }
}
