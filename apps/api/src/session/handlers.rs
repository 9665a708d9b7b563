//! Axum route handlers for the session API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::{Objective, Profile, UnknownObjective};
use crate::presentation::download::content_disposition;
use crate::presentation::view::View;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleObjectiveRequest {
    pub objective: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<View> {
    Json(state.session.view().await)
}

/// PUT /api/v1/session/profile
///
/// Replaces the form fields as the user types. Input state only.
/// A malformed body or an unknown objective label answers 400.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<View>, AppError> {
    let Json(profile) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(state.session.update_profile(profile).await?))
}

/// POST /api/v1/session/objectives/toggle
pub async fn handle_toggle_objective(
    State(state): State<AppState>,
    Json(request): Json<ToggleObjectiveRequest>,
) -> Result<Json<View>, AppError> {
    let objective: Objective = request
        .objective
        .parse()
        .map_err(|e: UnknownObjective| AppError::BadRequest(e.to_string()))?;

    Ok(Json(state.session.toggle_objective(objective).await?))
}

/// POST /api/v1/session/generate
///
/// Validate → Processing → await the provider → Output.
/// On failure the session is back in Input and only the generic message is returned.
pub async fn handle_generate(State(state): State<AppState>) -> Result<Json<View>, AppError> {
    Ok(Json(state.session.generate().await?))
}

/// POST /api/v1/session/details/toggle
pub async fn handle_toggle_details(State(state): State<AppState>) -> Result<Json<View>, AppError> {
    Ok(Json(state.session.toggle_details().await?))
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<View> {
    Json(state.session.reset().await)
}

/// GET /api/v1/session/download
///
/// All scripts as one plain-text attachment.
pub async fn handle_download(State(state): State<AppState>) -> Result<Response, AppError> {
    let download = state.session.download().await?;
    let disposition = content_disposition(&download.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.body,
    )
        .into_response())
}
