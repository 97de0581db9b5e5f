use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated_json::ValidatedJson;
use crate::api::dtos::{requests::VerifyAccessRequest, responses::VerifyAccessResponse};
use crate::api::extractors::invite_token::InviteToken;
use crate::error::AppError;
use std::sync::Arc;

pub async fn verify_access(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<VerifyAccessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = payload.invite_token.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let decision = state.access_service.verify_access(&event_id, &payload.email, token).await?;
    Ok(Json(VerifyAccessResponse::from(decision)))
}

pub async fn get_private_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    InviteToken(token): InviteToken,
) -> Result<impl IntoResponse, AppError> {
    let view = state.access_service.get_private_event(&event_id, token.as_deref()).await?;
    Ok(Json(view))
}
