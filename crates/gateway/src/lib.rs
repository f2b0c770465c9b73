//! `rc-gateway`: the `rollcall` binary's library half: HTTP surface,
//! process wiring and CLI helpers.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
