//! Runs the effects of one transition.
//!
//! Effects run strictly in order against the proposed session.  Replies are
//! buffered and only handed back when every effect succeeded, so a failed
//! step never produces a half-sent conversation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use rc_domain::error::Error;
use rc_domain::event::Outbound;
use rc_ledger::LedgerAdapter;
use rc_media::{CaptureRequest, MediaPipeline};
use rc_sessions::{ActorSession, DailyCompletionSet};

use crate::effect::Effect;
use crate::failure::{EffectFailure, EffectStage};

pub struct Executor {
    ledger: Arc<LedgerAdapter>,
    media: Arc<MediaPipeline>,
    completions: Arc<DailyCompletionSet>,
}

impl Executor {
    pub fn new(
        ledger: Arc<LedgerAdapter>,
        media: Arc<MediaPipeline>,
        completions: Arc<DailyCompletionSet>,
    ) -> Self {
        Self {
            ledger,
            media,
            completions,
        }
    }

    /// Execute `effects`, filling in what they produce (registration id,
    /// photo links) on `proposed`.
    pub async fn execute(
        &self,
        proposed: &mut ActorSession,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Outbound>, EffectFailure> {
        let mut outbound = Vec::new();

        for effect in effects {
            match effect {
                Effect::Send(out) => outbound.push(out),

                Effect::CreateRecord {
                    registration_id,
                    draft,
                } => {
                    if proposed.registration_id.is_some() {
                        tracing::debug!(
                            actor_id = proposed.actor_id,
                            "registration already exists, skipping create"
                        );
                        continue;
                    }
                    let id = self
                        .ledger
                        .create(registration_id, &draft)
                        .await
                        .map_err(|e| EffectFailure::new(EffectStage::CreateRecord, e))?;
                    proposed.registration_id = Some(id);
                    proposed.reserved_registration_id = None;
                }

                Effect::WriteCell { column, value } => {
                    let id = registration(proposed, EffectStage::WriteCell)?;
                    self.ledger
                        .write(id, column, &value)
                        .await
                        .map_err(|e| EffectFailure::new(EffectStage::WriteCell, e))?;
                }

                Effect::CapturePhoto { slot, media_ref } => {
                    let id = registration(proposed, EffectStage::CapturePhoto)?;
                    let link = self
                        .media
                        .capture(CaptureRequest {
                            registration_id: id,
                            actor_id: proposed.actor_id,
                            slot,
                            media_ref,
                            taken_at: now,
                        })
                        .await
                        .map_err(|e| EffectFailure::new(EffectStage::CapturePhoto, e))?;
                    proposed.collected_fields.insert(slot.photo_column(), link);
                }

                Effect::MarkCompleted { date } => {
                    self.completions.mark(proposed.actor_id, date);
                }
            }
        }

        Ok(outbound)
    }
}

fn registration(session: &ActorSession, stage: EffectStage) -> Result<uuid::Uuid, EffectFailure> {
    session.registration_id.ok_or_else(|| {
        EffectFailure::new(
            stage,
            Error::Other(format!(
                "actor {} reached {} without a registration",
                session.actor_id,
                session.state.as_str()
            )),
        )
    })
}
