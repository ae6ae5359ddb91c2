//! Page Routes

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::html;
use crate::AppState;

/// Serve the single-page UI
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(html::render_index(&state.presentation, state.pipeline.labels()))
}
