use std::sync::Arc;
use std::time::Instant;

use rc_domain::config::Config;
use rc_engine::{DailyResetScheduler, Engine};

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<Engine>,
    pub reset: Arc<DailyResetScheduler>,

    /// SHA-256 of the API bearer token; `None` disables the check.
    pub api_token_hash: Option<Vec<u8>>,
    /// SHA-256 of the admin bearer token; `None` disables the check.
    pub admin_token_hash: Option<Vec<u8>>,

    pub started_at: Instant,
}
