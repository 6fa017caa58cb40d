//! Web front end
//!
//! An axum router assembled from one `routes()` function per page group,
//! sharing an `AppState` behind an `Arc`.
//!
//! # Routes
//!
//! - `/` and the lesson pages (`pages`)
//! - `/ai` question form (`chat`)
//! - `/team` roster (`team`)
//! - `/dictionary` listing plus `/dictionary/{add,update,delete}` (`glossary`)
//! - `/style.css`, `/assets/*`, `/healthz`

pub mod chat;
pub mod glossary;
pub mod pages;
pub mod render;
pub mod team;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::ai::AiService;
use crate::store::TermStore;

pub use team::TeamMember;

const STYLE_CSS: &str = include_str!("../../static/style.css");

/// Everything a request handler can reach
pub struct AppState {
    pub store: Arc<TermStore>,
    pub ai: AiService,
    pub team: Vec<TeamMember>,
}

pub type SharedState = Arc<AppState>;

/// Builds the application router.
///
/// `assets_dir`, when given, is served under `/assets`.
pub fn router(state: SharedState, assets_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .merge(pages::routes())
        .merge(chat::routes())
        .merge(team::routes())
        .merge(glossary::routes())
        .route("/style.css", get(stylesheet))
        .route("/healthz", get(healthz));

    if let Some(dir) = assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn healthz(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "ai_available": state.ai.is_available(),
        "model": state.ai.model(),
    }))
}

#[cfg(test)]
mod tests;
