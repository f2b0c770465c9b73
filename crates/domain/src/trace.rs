use serde::Serialize;
use uuid::Uuid;

/// Structured trace events emitted across all Rollcall crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionTransition {
        actor_id: i64,
        from: String,
        to: String,
        input: String,
    },
    SessionDiscarded {
        actor_id: i64,
        state: String,
        reason: String,
    },
    StaleActionRejected {
        actor_id: i64,
        state: String,
    },
    RegistrationCreated {
        registration_id: Uuid,
        actor_id: i64,
        row: usize,
        attempts: u32,
    },
    LedgerCellWritten {
        registration_id: Uuid,
        column: String,
        row: usize,
    },
    LedgerHeadersSynced {
        sheet: String,
        rewritten: bool,
    },
    MediaCaptured {
        registration_id: Uuid,
        slot: String,
        raw_bytes: usize,
        stored_bytes: usize,
        duration_ms: u64,
    },
    ConsistencyFailure {
        actor_id: i64,
        registration_id: Uuid,
    },
    DailyReset {
        sessions_cleared: usize,
        completions_cleared: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "rc_event");
    }
}
