use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated_json::ValidatedJson;
use crate::api::dtos::{requests::{SignupRequest, UpsertProfileRequest}, responses::SignupResponse};
use crate::api::extractors::auth::AuthOrganizer;
use crate::domain::models::organizer::OrganizerProfile;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.session_service
        .register(payload.username.trim(), &payload.password)
        .await?;

    info!("Organizer created: {}", created.id);

    Ok(Json(SignupResponse {
        organizer_id: created.id,
        username: created.username,
    }))
}

pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.profile_repo.find_by_organizer(&organizer_id).await?
        .ok_or(AppError::NotFound("Profile not found".into()))?;
    Ok(Json(profile))
}

pub async fn upsert_my_profile(
    State(state): State<Arc<AppState>>,
    AuthOrganizer(organizer_id): AuthOrganizer,
    ValidatedJson(payload): ValidatedJson<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = OrganizerProfile {
        organizer_id,
        display_name: payload.display_name.trim().to_string(),
        bio: payload.bio,
        avatar_url: payload.avatar_url,
        website: payload.website,
        updated_at: Utc::now(),
    };

    let saved = state.profile_repo.upsert(&profile).await?;
    info!("Profile saved for organizer {}", saved.organizer_id);
    Ok(Json(saved))
}

pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(organizer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.profile_repo.find_by_organizer(&organizer_id).await?
        .ok_or(AppError::NotFound("Profile not found".into()))?;
    Ok(Json(profile))
}
