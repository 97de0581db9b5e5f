use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::convert::Infallible;
use crate::api::dtos::requests::InviteTokenQuery;

pub const INVITE_TOKEN_HEADER: &str = "X-Invite-Token";

/// Invite token from the `X-Invite-Token` header, falling back to the
/// `inviteToken` query parameter. Blank values count as absent.
pub struct InviteToken(pub Option<String>);

impl<S> FromRequestParts<S> for InviteToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts.headers.get(INVITE_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if from_header.is_some() {
            return Ok(InviteToken(from_header));
        }

        let from_query = Query::<InviteTokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.invite_token)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(InviteToken(from_query))
    }
}
