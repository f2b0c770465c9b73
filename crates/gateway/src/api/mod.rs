pub mod admin;
pub mod auth;
pub mod inbound;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Routes are split into **public** (health probe), **protected** (gated
/// behind the API bearer-token middleware) and **admin** (gated per handler
/// by [`admin::AdminGuard`]).
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/v1/health", get(admin::health));

    let protected = Router::new()
        .route("/v1/inbound", post(inbound::inbound))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    let admin = Router::new().route("/v1/admin/ledger/headers", post(admin::resync_headers));

    public.merge(protected).merge(admin)
}
