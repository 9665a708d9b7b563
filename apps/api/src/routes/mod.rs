pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::presentation::ui;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(ui::index_page))
        // Session API
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/profile", put(handlers::handle_update_profile))
        .route("/api/v1/session/objectives/toggle", post(handlers::handle_toggle_objective))
        .route("/api/v1/session/generate", post(handlers::handle_generate))
        .route("/api/v1/session/details/toggle", post(handlers::handle_toggle_details))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .route("/api/v1/session/download", get(handlers::handle_download))
        .with_state(state)
}
