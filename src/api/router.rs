use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{access, auth, event, health, invitee, organizer, registration};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Organizers
        .route("/api/v1/organizers", post(organizer::signup))
        .route("/api/v1/organizers/me/profile", get(organizer::get_my_profile).put(organizer::upsert_my_profile))
        .route("/api/v1/organizers/{organizer_id}/profile", get(organizer::get_public_profile))

        // Events (organizer)
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{event_id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/events/{event_id}/invitees", post(invitee::create_invitee).get(invitee::list_invitees))
        .route("/api/v1/events/{event_id}/invitees/{invitee_id}", delete(invitee::delete_invitee))
        .route("/api/v1/events/{event_id}/registrations", get(registration::list_registrations))

        // Private event access (public)
        .route("/api/v1/events/{event_id}/verify-access", post(access::verify_access))
        .route("/api/v1/events/{event_id}/private", get(access::get_private_event))

        // Registration (public)
        .route("/api/v1/events/{event_id}/register", post(registration::register))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        organizer_id = tracing::field::Empty,
                        event_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
