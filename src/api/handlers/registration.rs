use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated_json::ValidatedJson;
use crate::api::extractors::auth::AuthOrganizer;
use crate::api::dtos::requests::RegisterRequest;
use crate::api::handlers::event::load_owned_event;
use crate::domain::models::{
    event::EventStatus,
    registration::{NewRegistrationParams, Referral, Registration},
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Mock purchase: records a confirmed registration, no payment is taken.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    match event.status() {
        EventStatus::Draft => return Err(AppError::NotFound("Event not found".into())),
        EventStatus::Cancelled => return Err(AppError::Conflict("Event is cancelled".into())),
        _ => {}
    }

    let token = payload.invite_token.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if event.is_private() {
        let decision = state.access_service.verify_access(&event.id, &payload.email, token).await?;
        if !decision.has_access() {
            return Err(AppError::Forbidden("This email has not been invited to this event".into()));
        }
    }

    let referrer = match token {
        Some(t) => state.invitee_repo.find_by_token_and_event(t, &event.id).await?,
        None => None,
    };

    let registration = Registration::new(NewRegistrationParams {
        event_id: event.id.clone(),
        name: payload.name,
        email: payload.email,
        invite_token: token.map(str::to_string),
        quantity: payload.quantity.unwrap_or(1),
        paid: event.has_tickets,
    });
    let created = state.registration_repo.create(&registration).await?;

    info!("Registration {} created for event {}", created.id, event.id);

    if let Some(referrer) = referrer
        && referrer.email != created.email
    {
        let referral = Referral::new(event.id.clone(), referrer.id.clone(), referrer.email.clone(), &created);
        state.referral_repo.create(&referral).await?;
        state.invitee_repo.increment_referred(&referrer.id).await?;
        info!("Referral recorded for invitee {} on event {}", referrer.id, event.id);
    }

    Ok(Json(created))
}

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_owned_event(&state, &organizer_id, &event_id).await?;
    let registrations = state.registration_repo.list_by_event(&event.id).await?;
    Ok(Json(registrations))
}
