//! Per-actor protocol state for Rollcall.
//!
//! The session store is the single source of truth for where each actor is
//! in the attendance protocol.  Sessions are kept in memory, snapshotted to
//! `sessions.json` under the state path, and discarded at local midnight
//! together with the daily completion set.

pub mod completions;
pub mod lifecycle;
pub mod session;
pub mod store;
pub mod tokens;

pub use completions::DailyCompletionSet;
pub use lifecycle::{is_stale, local_date, next_local_midnight};
pub use session::{ActorSession, PendingMedia, ProtocolState};
pub use store::{MemorySessionStore, SessionStore};
pub use tokens::{Action, ActionTokens};
