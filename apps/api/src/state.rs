use crate::session::service::SessionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single in-memory session: controller, generator and webhook sync.
    pub session: SessionService,
}
