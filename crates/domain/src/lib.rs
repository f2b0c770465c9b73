//! Shared domain types for Rollcall.
//!
//! Everything the attendance crates agree on lives here: the error type,
//! the configuration tree, the normalized inbound/outbound chat events,
//! the ledger column schema, the retry policy, JSON snapshot helpers and
//! the clock abstraction.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod retry;
pub mod snapshot;
pub mod trace;
