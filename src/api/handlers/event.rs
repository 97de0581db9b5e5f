use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated_json::ValidatedJson;
use crate::api::extractors::auth::AuthOrganizer;
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::{Event, EventStatus, NewEventParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

/// Loads an event owned by `organizer_id`. Other organizers' events look missing.
pub async fn load_owned_event(state: &AppState, organizer_id: &str, event_id: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_id(event_id).await?
        .filter(|e| e.owner_id == organizer_id)
        .ok_or(AppError::NotFound("Event not found".into()))
}

fn parse_status(raw: &str) -> Result<EventStatus, AppError> {
    raw.parse::<EventStatus>().map_err(AppError::Validation)
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(&payload.status)?;

    info!("Creating event '{}' for organizer {}", payload.title, organizer_id);

    let event = Event::new(NewEventParams {
        owner_id: organizer_id,
        title: payload.title.trim().to_string(),
        date: payload.date,
        time: payload.time,
        location: payload.location,
        bio: payload.bio,
        agenda: payload.agenda,
        qa: payload.qa,
        image_url: payload.image_url,
        status,
        has_tickets: payload.has_tickets,
        requires_tickets: payload.requires_tickets,
    });

    let created = state.event_repo.create(&event).await?;
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_owner(&organizer_id).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_owned_event(&state, &organizer_id, &event_id).await?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_owned_event(&state, &organizer_id, &event_id).await?;

    if let Some(v) = payload.title { event.title = v.trim().to_string(); }
    if let Some(v) = payload.date { event.date = v; }
    if let Some(v) = payload.time { event.time = v; }
    if let Some(v) = payload.location { event.location = v; }
    if let Some(v) = payload.bio { event.bio = v; }
    if let Some(v) = payload.agenda { event.agenda = v; }
    if let Some(v) = payload.qa { event.qa = v; }
    if let Some(v) = payload.image_url { event.image_url = Some(v); }
    if let Some(v) = payload.has_tickets { event.has_tickets = v; }
    if let Some(v) = payload.requires_tickets { event.requires_tickets = v; }
    if let Some(v) = payload.status {
        let status = parse_status(&v)?;
        if status != event.status() {
            info!("Event {} status {} -> {}", event.id, event.status, status);
        }
        event.status = status.as_str().to_string();
    }
    event.updated_at = Utc::now();

    let updated = state.event_repo.update(&event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.delete(&organizer_id, &event_id).await?;
    info!("Deleted event: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
