use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated_json::ValidatedJson;
use crate::api::extractors::auth::AuthOrganizer;
use crate::api::dtos::requests::CreateInviteeRequest;
use crate::api::handlers::event::load_owned_event;
use crate::domain::models::invitee::Invitee;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_invitee(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateInviteeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_owned_event(&state, &organizer_id, &event_id).await?;

    let invitee = Invitee::new(event.id, &payload.email);
    if state.invitee_repo.find_by_event_and_email(&invitee.event_id, &invitee.email).await?.is_some() {
        return Err(AppError::Conflict("Email already invited to this event".into()));
    }

    let created = state.invitee_repo.create(&invitee).await?;

    info!("Issued invite token for event {}", event_id);

    Ok(Json(created))
}

pub async fn list_invitees(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_owned_event(&state, &organizer_id, &event_id).await?;
    let invitees = state.invitee_repo.list_by_event(&event.id).await?;
    Ok(Json(invitees))
}

pub async fn delete_invitee(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path((event_id, invitee_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_owned_event(&state, &organizer_id, &event_id).await?;
    state.invitee_repo.delete(&event.id, &invitee_id).await?;
    info!("Deleted invitee: {}", invitee_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
