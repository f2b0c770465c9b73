//! Health probe and ledger maintenance endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

use super::guard::AdminGuard;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/health: lightweight health probe (public, no auth)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.engine.sessions().len(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/admin/ledger/headers: rewrite the header row if needed
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn resync_headers(_guard: AdminGuard, State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.ledger().sync_headers().await {
        Ok(rewritten) => {
            tracing::info!(rewritten, "ledger headers resynced via API");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "sheet": state.config.ledger.sheet_title,
                    "rewritten": rewritten,
                })),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "ledger header resync failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}
