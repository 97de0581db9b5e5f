use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use crate::api::dtos::{requests::LoginRequest, responses::SessionResponse};
use crate::api::extractors::validated_json::ValidatedJson;
use crate::domain::models::{
    organizer::Organizer,
    session::{IssuedSession, ACCESS_TTL_MINUTES, REFRESH_TTL_DAYS},
};
use crate::error::AppError;
use crate::state::AppState;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

fn session_cookie(name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Sets both cookies and hands the CSRF token back in the body.
fn open_session(cookies: &Cookies, organizer: Organizer, issued: IssuedSession) -> Json<SessionResponse> {
    cookies.add(session_cookie(ACCESS_COOKIE, issued.access_token, Duration::minutes(ACCESS_TTL_MINUTES)));
    cookies.add(session_cookie(REFRESH_COOKIE, issued.refresh_token, Duration::days(REFRESH_TTL_DAYS)));
    Json(SessionResponse::new(issued.csrf_token, organizer))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (organizer, issued) = state.session_service
        .login(payload.username.trim(), &payload.password)
        .await?;
    Ok(open_session(&cookies, organizer, issued))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let presented = cookies.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;
    let (organizer, issued) = state.session_service.rotate(presented.value()).await?;
    Ok(open_session(&cookies, organizer, issued))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(presented) = cookies.get(REFRESH_COOKIE) {
        state.session_service.end(presented.value()).await?;
    }

    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        cookies.remove(Cookie::build(name).path("/").build());
    }
    Ok(StatusCode::NO_CONTENT)
}
