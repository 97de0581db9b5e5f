use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, Method},
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

use crate::api::handlers::auth::ACCESS_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Signed-in organizer id, taken from the access cookie.
/// Unsafe methods must also echo the session's CSRF token in `X-CSRF-Token`.
pub struct AuthOrganizer(pub String);

impl<S> FromRequestParts<S> for AuthOrganizer
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or_else(|| AppError::InternalWithMsg("CookieManagerLayer is not installed".into()))?;
        let access_token = cookies.get(ACCESS_COOKIE)
            .ok_or(AppError::Unauthorized)?;

        let state = Arc::<AppState>::from_ref(state);
        let claims = state.session_service.authenticate(access_token.value())?;

        let safe = matches!(parts.method, Method::GET | Method::HEAD | Method::OPTIONS);
        if !safe {
            let echoed = parts.headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
            if echoed != Some(claims.csrf.as_str()) {
                return Err(AppError::Forbidden("Missing or mismatched CSRF token".into()));
            }
        }

        Span::current().record("organizer_id", claims.sub.as_str());
        Ok(AuthOrganizer(claims.sub))
    }
}
