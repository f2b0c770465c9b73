//! `rc-engine`: the per-actor attendance workflow.
//!
//! An inbound event flows through:
//!
//! 1. [`ActorLocks`]: one event per actor at a time, FIFO.
//! 2. [`gate::check`]: content-type contract and stale-button rejection.
//! 3. [`machine::transition`]: pure `(session, input) → (session', effects)`.
//! 4. [`Executor`]: runs ledger and media effects; the proposed session is
//!    committed only when every effect succeeded.
//!
//! [`DailyResetScheduler`] clears sessions and the completion set at local
//! midnight.

pub mod actor_lock;
pub mod command;
pub mod effect;
pub mod engine;
pub mod executor;
pub mod failure;
pub mod gate;
pub mod machine;
pub mod messages;
pub mod reset;

pub use actor_lock::ActorLocks;
pub use command::Command;
pub use effect::Effect;
pub use engine::{Engine, EngineDeps};
pub use executor::Executor;
pub use failure::{EffectFailure, EffectStage, FailureKind};
pub use gate::{GateDecision, Input, Rejection};
pub use machine::{Context, Transition};
pub use reset::{DailyResetScheduler, ResetReport};
