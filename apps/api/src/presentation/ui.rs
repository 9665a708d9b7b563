//! Embedded browser page. All state lives in the session API; the page only renders views.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
pub async fn index_page() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/html; charset=utf-8"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        INDEX_HTML,
    )
        .into_response()
}
