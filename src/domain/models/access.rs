use serde::Serialize;

use crate::domain::models::{event::Event, organizer::OrganizerProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    PublicEvent,
    Invited,
    SharedLink,
    NotInvited,
}

/// Outcome of an access check. Recomputed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The event is not private; the token is echoed back untouched.
    PublicEvent { invite_token: Option<String> },
    /// The email matches an invitee of the event.
    Invited { invitee_id: String, invite_token: String },
    /// The email is unknown but the token belongs to an invitee of the event.
    SharedLink { invite_token: String, shared_by: String },
    NotInvited,
}

impl AccessDecision {
    pub fn has_access(&self) -> bool {
        !matches!(self, AccessDecision::NotInvited)
    }

    pub fn reason(&self) -> AccessReason {
        match self {
            AccessDecision::PublicEvent { .. } => AccessReason::PublicEvent,
            AccessDecision::Invited { .. } => AccessReason::Invited,
            AccessDecision::SharedLink { .. } => AccessReason::SharedLink,
            AccessDecision::NotInvited => AccessReason::NotInvited,
        }
    }

    pub fn invite_token(&self) -> Option<&str> {
        match self {
            AccessDecision::PublicEvent { invite_token } => invite_token.as_deref(),
            AccessDecision::Invited { invite_token, .. }
            | AccessDecision::SharedLink { invite_token, .. } => Some(invite_token),
            AccessDecision::NotInvited => None,
        }
    }
}

/// Organizer card on the private page. Carries no organizer id.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HostCard {
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
}

impl From<OrganizerProfile> for HostCard {
    fn from(profile: OrganizerProfile) -> Self {
        Self {
            display_name: profile.display_name,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            website: profile.website,
        }
    }
}

/// Event as shown to invitees: organizer-only fields are left out.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrivateEventView {
    pub id: String,
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
    pub registration_count: i64,
    pub referral_count: i64,
    pub organizer: Option<HostCard>,
}

impl PrivateEventView {
    pub fn new(event: Event, registration_count: i64, referral_count: i64, organizer: Option<OrganizerProfile>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            date: event.date,
            time: event.time,
            location: event.location,
            bio: event.bio,
            agenda: event.agenda,
            qa: event.qa,
            image_url: event.image_url,
            status: event.status,
            has_tickets: event.has_tickets,
            requires_tickets: event.requires_tickets,
            registration_count,
            referral_count,
            organizer: organizer.map(HostCard::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_invited_denies() {
        let public = AccessDecision::PublicEvent { invite_token: None };
        let invited = AccessDecision::Invited { invitee_id: "i".into(), invite_token: "t".into() };
        let shared = AccessDecision::SharedLink { invite_token: "t".into(), shared_by: "a@x.com".into() };

        assert!(public.has_access());
        assert!(invited.has_access());
        assert!(shared.has_access());
        assert!(!AccessDecision::NotInvited.has_access());
        assert_eq!(AccessDecision::NotInvited.reason(), AccessReason::NotInvited);
        assert_eq!(shared.invite_token(), Some("t"));
        assert_eq!(public.invite_token(), None);
    }

    #[test]
    fn test_view_hides_owner_identity() {
        use crate::domain::models::event::{EventStatus, NewEventParams};
        use chrono::Utc;

        let event = Event::new(NewEventParams {
            owner_id: "owner-123".into(),
            title: "Preview".into(),
            date: "2030-01-01".into(),
            time: "19:00".into(),
            location: "Hall".into(),
            bio: String::new(),
            agenda: String::new(),
            qa: String::new(),
            image_url: None,
            status: EventStatus::Private,
            has_tickets: false,
            requires_tickets: false,
        });
        let profile = OrganizerProfile {
            organizer_id: "owner-123".into(),
            display_name: "Owls".into(),
            bio: None,
            avatar_url: None,
            website: None,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(PrivateEventView::new(event, 0, 0, Some(profile))).unwrap();

        assert_eq!(json["organizer"]["displayName"], "Owls");
        assert!(!json.to_string().contains("owner-123"));
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        let json = serde_json::to_string(&AccessReason::SharedLink).unwrap();
        assert_eq!(json, "\"shared_link\"");
    }
}
