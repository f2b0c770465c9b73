//! Admin endpoints: health probe and ledger header resync.
//!
//! Admin-guarded endpoints use the `AdminGuard` extractor (see `guard.rs`),
//! which enforces the `admin.token_env` bearer token.  If the env var is
//! unset, endpoints are accessible without auth.

mod guard;
mod health;

pub use guard::AdminGuard;
pub use health::{health, resync_headers};
