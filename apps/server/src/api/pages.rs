//! Static pages.

use axum::response::Html;

/// Serves the user form at the root URL.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
