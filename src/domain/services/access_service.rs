use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info, warn, Span};

use crate::domain::models::{
    access::{AccessDecision, PrivateEventView},
    invitee::normalize_email,
};
use crate::domain::ports::{
    EventRepository, InviteeRepository, OrganizerProfileRepository,
    ReferralRepository, RegistrationRepository,
};
use crate::error::AppError;

/// Private-event gate: decides who may see a private event and serves the
/// redacted view to token holders.
pub struct AccessService {
    event_repo: Arc<dyn EventRepository>,
    invitee_repo: Arc<dyn InviteeRepository>,
    profile_repo: Arc<dyn OrganizerProfileRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    referral_repo: Arc<dyn ReferralRepository>,
}

impl AccessService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        invitee_repo: Arc<dyn InviteeRepository>,
        profile_repo: Arc<dyn OrganizerProfileRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        referral_repo: Arc<dyn ReferralRepository>,
    ) -> Self {
        Self { event_repo, invitee_repo, profile_repo, registration_repo, referral_repo }
    }

    /// Precedence: non-private event, direct invitation, shared link, denial.
    /// Only the direct-invitation path writes (first-access tracking).
    pub async fn verify_access(
        &self,
        event_id: &str,
        email: &str,
        invite_token: Option<&str>,
    ) -> Result<AccessDecision, AppError> {
        Span::current().record("event_id", event_id);

        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if !event.is_private() {
            return Ok(AccessDecision::PublicEvent {
                invite_token: invite_token.map(str::to_string),
            });
        }

        let email = normalize_email(email);

        if let Some(invitee) = self.invitee_repo.find_by_event_and_email(event_id, &email).await? {
            if invitee.accessed_at.is_none() {
                // Best-effort: a failed update still yields the decision.
                match self.invitee_repo.mark_accessed(&invitee.id, Utc::now()).await {
                    Ok(true) => info!("First access recorded for invitee {}", invitee.id),
                    Ok(false) => debug!("Invitee {} already marked as accessed", invitee.id),
                    Err(e) => warn!("Failed to record access for invitee {}: {}", invitee.id, e),
                }
            }

            return Ok(AccessDecision::Invited {
                invitee_id: invitee.id,
                invite_token: invitee.invite_token,
            });
        }

        if let Some(token) = invite_token
            && let Some(owner) = self.invitee_repo.find_by_token(token).await?
            && owner.event_id == event_id
        {
            info!("Shared link access to event {} via invitee {}", event_id, owner.id);
            return Ok(AccessDecision::SharedLink {
                invite_token: token.to_string(),
                shared_by: owner.email,
            });
        }

        debug!("Access denied to event {}", event_id);
        Ok(AccessDecision::NotInvited)
    }

    pub async fn get_private_event(
        &self,
        event_id: &str,
        invite_token: Option<&str>,
    ) -> Result<PrivateEventView, AppError> {
        Span::current().record("event_id", event_id);

        let token = invite_token
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        self.invitee_repo.find_by_token_and_event(token, event_id).await?
            .ok_or(AppError::Forbidden("Invite token is not valid for this event".into()))?;

        let event = self.event_repo.find_private(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let organizer = self.profile_repo.find_by_organizer(&event.owner_id).await?;
        let registration_count = self.registration_repo.count_by_event(&event.id).await?;
        let referral_count = self.referral_repo.count_by_event(&event.id).await?;

        Ok(PrivateEventView::new(event, registration_count, referral_count, organizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        event::{Event, EventStatus, NewEventParams},
        invitee::Invitee,
        organizer::OrganizerProfile,
        registration::{Registration, Referral},
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        events: Mutex<Vec<Event>>,
        invitees: Mutex<Vec<Invitee>>,
        fail_mark_accessed: bool,
    }

    #[async_trait]
    impl EventRepository for MemoryStore {
        async fn create(&self, event: &Event) -> Result<Event, AppError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(event.clone())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
            Ok(self.events.lock().unwrap().iter().find(|e| e.id == id).cloned())
        }
        async fn find_private(&self, id: &str) -> Result<Option<Event>, AppError> {
            Ok(self.events.lock().unwrap().iter().find(|e| e.id == id && e.is_private()).cloned())
        }
        async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError> {
            Ok(self.events.lock().unwrap().iter().filter(|e| e.owner_id == owner_id).cloned().collect())
        }
        async fn update(&self, event: &Event) -> Result<Event, AppError> {
            let mut events = self.events.lock().unwrap();
            let slot = events.iter_mut().find(|e| e.id == event.id)
                .ok_or(AppError::NotFound("Event not found".into()))?;
            *slot = event.clone();
            Ok(event.clone())
        }
        async fn delete(&self, _owner_id: &str, id: &str) -> Result<(), AppError> {
            self.events.lock().unwrap().retain(|e| e.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl InviteeRepository for MemoryStore {
        async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError> {
            self.invitees.lock().unwrap().push(invitee.clone());
            Ok(invitee.clone())
        }
        async fn find_by_token(&self, token: &str) -> Result<Option<Invitee>, AppError> {
            Ok(self.invitees.lock().unwrap().iter().find(|i| i.invite_token == token).cloned())
        }
        async fn find_by_token_and_event(&self, token: &str, event_id: &str) -> Result<Option<Invitee>, AppError> {
            Ok(self.invitees.lock().unwrap().iter()
                .find(|i| i.invite_token == token && i.event_id == event_id).cloned())
        }
        async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError> {
            Ok(self.invitees.lock().unwrap().iter()
                .find(|i| i.event_id == event_id && i.email == email).cloned())
        }
        async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError> {
            Ok(self.invitees.lock().unwrap().iter().filter(|i| i.event_id == event_id).cloned().collect())
        }
        async fn mark_accessed(&self, id: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
            if self.fail_mark_accessed {
                return Err(AppError::InternalWithMsg("store offline".into()));
            }
            let mut invitees = self.invitees.lock().unwrap();
            match invitees.iter_mut().find(|i| i.id == id && i.accessed_at.is_none()) {
                Some(invitee) => {
                    invitee.has_accessed = true;
                    invitee.accessed_at = Some(at);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        async fn increment_referred(&self, id: &str) -> Result<(), AppError> {
            if let Some(invitee) = self.invitees.lock().unwrap().iter_mut().find(|i| i.id == id) {
                invitee.referred_count += 1;
            }
            Ok(())
        }
        async fn delete(&self, _event_id: &str, id: &str) -> Result<(), AppError> {
            self.invitees.lock().unwrap().retain(|i| i.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl OrganizerProfileRepository for MemoryStore {
        async fn find_by_organizer(&self, _organizer_id: &str) -> Result<Option<OrganizerProfile>, AppError> {
            Ok(None)
        }
        async fn upsert(&self, profile: &OrganizerProfile) -> Result<OrganizerProfile, AppError> {
            Ok(profile.clone())
        }
    }

    #[async_trait]
    impl RegistrationRepository for MemoryStore {
        async fn create(&self, registration: &Registration) -> Result<Registration, AppError> {
            Ok(registration.clone())
        }
        async fn list_by_event(&self, _event_id: &str) -> Result<Vec<Registration>, AppError> {
            Ok(vec![])
        }
        async fn count_by_event(&self, _event_id: &str) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    #[async_trait]
    impl ReferralRepository for MemoryStore {
        async fn create(&self, referral: &Referral) -> Result<Referral, AppError> {
            Ok(referral.clone())
        }
        async fn count_by_event(&self, _event_id: &str) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    fn event(id: &str, status: EventStatus) -> Event {
        let mut event = Event::new(NewEventParams {
            owner_id: "owner-1".into(),
            title: "Launch".into(),
            date: "2030-01-01".into(),
            time: "18:00".into(),
            location: "Rooftop".into(),
            bio: String::new(),
            agenda: String::new(),
            qa: String::new(),
            image_url: None,
            status,
            has_tickets: false,
            requires_tickets: false,
        });
        event.id = id.to_string();
        event
    }

    fn invitee(event_id: &str, email: &str, token: &str) -> Invitee {
        let mut invitee = Invitee::new(event_id.into(), email);
        invitee.invite_token = token.to_string();
        invitee
    }

    fn service(store: Arc<MemoryStore>) -> AccessService {
        AccessService::new(store.clone(), store.clone(), store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn test_public_event_skips_invitee_lookup() {
        let store = Arc::new(MemoryStore::default());
        store.events.lock().unwrap().push(event("evt-pub", EventStatus::Published));

        let decision = service(store).verify_access("evt-pub", "anyone@x.com", Some("tok")).await.unwrap();
        assert_eq!(decision, AccessDecision::PublicEvent { invite_token: Some("tok".into()) });
    }

    #[tokio::test]
    async fn test_invited_shared_and_denied() {
        let store = Arc::new(MemoryStore::default());
        store.events.lock().unwrap().push(event("evt1", EventStatus::Private));
        store.events.lock().unwrap().push(event("evt2", EventStatus::Private));
        store.invitees.lock().unwrap().push(invitee("evt1", "a@x.com", "tok-a"));
        let svc = service(store.clone());

        let invited = svc.verify_access("evt1", "A@X.com", None).await.unwrap();
        assert!(matches!(invited, AccessDecision::Invited { ref invite_token, .. } if invite_token == "tok-a"));
        assert!(store.invitees.lock().unwrap()[0].has_accessed);

        let shared = svc.verify_access("evt1", "b@x.com", Some("tok-a")).await.unwrap();
        assert_eq!(shared, AccessDecision::SharedLink { invite_token: "tok-a".into(), shared_by: "a@x.com".into() });

        let denied = svc.verify_access("evt1", "c@x.com", None).await.unwrap();
        assert_eq!(denied, AccessDecision::NotInvited);

        let cross_event = svc.verify_access("evt2", "b@x.com", Some("tok-a")).await.unwrap();
        assert_eq!(cross_event, AccessDecision::NotInvited);
    }

    #[tokio::test]
    async fn test_first_access_timestamp_is_sticky() {
        let store = Arc::new(MemoryStore::default());
        store.events.lock().unwrap().push(event("evt1", EventStatus::Private));
        store.invitees.lock().unwrap().push(invitee("evt1", "a@x.com", "tok-a"));
        let svc = service(store.clone());

        svc.verify_access("evt1", "a@x.com", None).await.unwrap();
        let first = store.invitees.lock().unwrap()[0].accessed_at;
        svc.verify_access("evt1", "a@x.com", None).await.unwrap();
        let second = store.invitees.lock().unwrap()[0].accessed_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_tracking_failure_still_grants_access() {
        let store = Arc::new(MemoryStore { fail_mark_accessed: true, ..Default::default() });
        store.events.lock().unwrap().push(event("evt1", EventStatus::Private));
        store.invitees.lock().unwrap().push(invitee("evt1", "a@x.com", "tok-a"));

        let decision = service(store.clone()).verify_access("evt1", "a@x.com", None).await.unwrap();
        assert!(decision.has_access());
        assert!(!store.invitees.lock().unwrap()[0].has_accessed);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let store = Arc::new(MemoryStore::default());
        let err = service(store).verify_access("missing", "a@x.com", Some("tok")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_private_reader_error_states() {
        let store = Arc::new(MemoryStore::default());
        store.events.lock().unwrap().push(event("evt1", EventStatus::Private));
        store.events.lock().unwrap().push(event("evt2", EventStatus::Private));
        store.invitees.lock().unwrap().push(invitee("evt1", "a@x.com", "tok-a"));
        let svc = service(store.clone());

        assert!(matches!(svc.get_private_event("evt1", None).await, Err(AppError::Unauthorized)));
        assert!(matches!(svc.get_private_event("evt2", Some("tok-a")).await, Err(AppError::Forbidden(_))));

        let view = svc.get_private_event("evt1", Some("tok-a")).await.unwrap();
        assert_eq!(view.title, "Launch");

        store.events.lock().unwrap()[0].status = EventStatus::Public.as_str().to_string();
        assert!(matches!(svc.get_private_event("evt1", Some("tok-a")).await, Err(AppError::NotFound(_))));
    }
}
