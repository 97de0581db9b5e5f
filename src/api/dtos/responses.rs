use serde::Serialize;

use crate::domain::models::{
    access::{AccessDecision, AccessReason},
    organizer::Organizer,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub organizer_id: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct SessionOrganizer {
    pub id: String,
    pub username: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub csrf_token: String,
    pub organizer: SessionOrganizer,
}

impl SessionResponse {
    pub fn new(csrf_token: String, organizer: Organizer) -> Self {
        Self {
            csrf_token,
            organizer: SessionOrganizer { id: organizer.id, username: organizer.username },
        }
    }
}

/// Wire shape of an access decision. Granted responses always carry
/// `inviteToken` (possibly null); denials carry `message` instead.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAccessResponse {
    pub has_access: bool,
    pub reason: AccessReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AccessDecision> for VerifyAccessResponse {
    fn from(decision: AccessDecision) -> Self {
        let has_access = decision.has_access();
        let reason = decision.reason();

        let mut response = Self {
            has_access,
            reason,
            invite_token: None,
            invitee_id: None,
            shared_by: None,
            message: None,
        };

        match decision {
            AccessDecision::PublicEvent { invite_token } => {
                response.invite_token = Some(invite_token);
            }
            AccessDecision::Invited { invitee_id, invite_token } => {
                response.invite_token = Some(Some(invite_token));
                response.invitee_id = Some(invitee_id);
            }
            AccessDecision::SharedLink { invite_token, shared_by } => {
                response.invite_token = Some(Some(invite_token));
                response.shared_by = Some(shared_by);
            }
            AccessDecision::NotInvited => {
                response.message = Some("This email has not been invited to this event".to_string());
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_event_serializes_null_token() {
        let body = serde_json::to_value(VerifyAccessResponse::from(
            AccessDecision::PublicEvent { invite_token: None },
        )).unwrap();

        assert_eq!(body, json!({ "hasAccess": true, "reason": "public_event", "inviteToken": null }));
    }

    #[test]
    fn test_denial_has_message_and_no_token() {
        let body = serde_json::to_value(VerifyAccessResponse::from(AccessDecision::NotInvited)).unwrap();

        assert_eq!(body["hasAccess"], false);
        assert_eq!(body["reason"], "not_invited");
        assert!(body.get("inviteToken").is_none());
        assert!(body["message"].is_string());
    }

    #[test]
    fn test_shared_link_carries_sharer() {
        let body = serde_json::to_value(VerifyAccessResponse::from(AccessDecision::SharedLink {
            invite_token: "tok-a".into(),
            shared_by: "a@x.com".into(),
        })).unwrap();

        assert_eq!(body, json!({
            "hasAccess": true,
            "reason": "shared_link",
            "inviteToken": "tok-a",
            "sharedBy": "a@x.com"
        }));
    }
}
