//! Failure taxonomy at the effect boundary.
//!
//! Nothing here escapes to the transport: every failure becomes a reply.

use rc_domain::error::Error;
use rc_domain::event::Outbound;
use rc_sessions::ActorSession;

use crate::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Wrong content type for the step.  Raised by the gate.
    Validation,
    /// Button token not in the active set.  Raised by the gate.
    StaleAction,
    /// Network or storage fault that outlived the retry policy.
    Transient,
    /// A known registration no longer resolves to a ledger row.
    Consistency,
    Unclassified,
}

impl FailureKind {
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Consistency { .. } => FailureKind::Consistency,
            e if e.is_transient() => FailureKind::Transient,
            _ => FailureKind::Unclassified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::StaleAction => "stale_action",
            FailureKind::Transient => "transient",
            FailureKind::Consistency => "consistency",
            FailureKind::Unclassified => "unclassified",
        }
    }
}

/// Which effect an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStage {
    CreateRecord,
    WriteCell,
    CapturePhoto,
}

impl EffectStage {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectStage::CreateRecord => "create_record",
            EffectStage::WriteCell => "write_cell",
            EffectStage::CapturePhoto => "capture_photo",
        }
    }
}

/// An effect that failed after its retries.
#[derive(Debug)]
pub struct EffectFailure {
    pub stage: EffectStage,
    pub error: Error,
}

impl EffectFailure {
    pub fn new(stage: EffectStage, error: Error) -> Self {
        Self { stage, error }
    }

    pub fn kind(&self) -> FailureKind {
        FailureKind::classify(&self.error)
    }

    /// Reply for a failure that leaves `session` untouched.  Keeps the
    /// still-valid buttons attached so the actor can press them again.
    pub fn reply(&self, session: &ActorSession) -> Outbound {
        let text = match (self.kind(), self.stage) {
            (FailureKind::Consistency, _) => return Outbound::reply(messages::restart_required()),
            (FailureKind::Transient, EffectStage::CapturePhoto) => messages::media_failed(),
            (FailureKind::Transient, _) => messages::ledger_failed(),
            _ => messages::generic_failure(),
        };
        match messages::active_keyboard(&session.active_action_tokens) {
            Some(keyboard) => Outbound::reply_with(text, keyboard),
            None => Outbound::reply(text),
        }
    }
}

impl std::fmt::Display for EffectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage.as_str(), self.error)
    }
}

impl std::error::Error for EffectFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
