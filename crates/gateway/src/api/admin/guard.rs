//! Admin auth guard: `AdminGuard` Axum extractor.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Json;

use crate::api::auth::bearer_matches;
use crate::state::AppState;

/// Axum extractor that enforces the admin bearer token.  Handlers opt in
/// by adding `_guard: AdminGuard` to their parameter list.
pub struct AdminGuard;

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected_hash) = &state.admin_token_hash else {
            return Ok(AdminGuard);
        };

        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        if !bearer_matches(header, expected_hash) {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "invalid admin token" })),
            ));
        }
        Ok(AdminGuard)
    }
}
