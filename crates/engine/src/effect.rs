use rc_domain::event::Outbound;
use rc_domain::record::{Column, PhotoSlot, RecordDraft};
use uuid::Uuid;

/// Declarative side effect produced by a transition.  Effects run in order;
/// any failure aborts the rest and discards queued replies.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Queue a reply or message edit.
    Send(Outbound),
    /// Create the registration row under a reserved id; skipped when the
    /// session already has a `registration_id`.
    CreateRecord {
        registration_id: Uuid,
        draft: RecordDraft,
    },
    /// Overwrite one cell of the session's registration.
    WriteCell { column: Column, value: String },
    /// Download, compress and upload a confirmed photo, then write its link.
    CapturePhoto { slot: PhotoSlot, media_ref: String },
    /// Record today's completion for the same-day lockout.
    MarkCompleted { date: chrono::NaiveDate },
}

impl Effect {
    /// Whether the effect talks to an external system.
    pub fn is_io(&self) -> bool {
        !matches!(self, Effect::Send(_))
    }
}
