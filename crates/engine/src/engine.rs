//! The dispatcher: lock → load → gate → transition → execute → commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use rc_domain::clock::Clock;
use rc_domain::config::{ProtocolConfig, TimeWindow};
use rc_domain::error::Error;
use rc_domain::event::{ActorId, InboundEvent, Outbound};
use rc_domain::trace::TraceEvent;
use rc_ledger::LedgerAdapter;
use rc_media::MediaPipeline;
use rc_sessions::{is_stale, ActorSession, DailyCompletionSet, SessionStore};

use crate::actor_lock::ActorLocks;
use crate::executor::Executor;
use crate::failure::{EffectFailure, FailureKind};
use crate::gate::{self, GateDecision, Rejection};
use crate::machine::{self, Context, Transition};
use crate::messages;

/// Everything the engine is wired to.
pub struct EngineDeps {
    pub protocol: ProtocolConfig,
    pub sessions: Arc<dyn SessionStore>,
    pub completions: Arc<DailyCompletionSet>,
    pub ledger: Arc<LedgerAdapter>,
    pub media: Arc<MediaPipeline>,
    pub clock: Arc<dyn Clock>,
}

pub struct Engine {
    protocol: ProtocolConfig,
    tz: Tz,
    window: TimeWindow,
    sessions: Arc<dyn SessionStore>,
    completions: Arc<DailyCompletionSet>,
    ledger: Arc<LedgerAdapter>,
    executor: Executor,
    clock: Arc<dyn Clock>,
    locks: ActorLocks,
}

impl Engine {
    pub fn new(deps: EngineDeps) -> Self {
        let tz = deps.protocol.tz();
        let window = deps.protocol.window();
        let executor = Executor::new(
            deps.ledger.clone(),
            deps.media,
            deps.completions.clone(),
        );
        Self {
            protocol: deps.protocol,
            tz,
            window,
            sessions: deps.sessions,
            completions: deps.completions,
            ledger: deps.ledger,
            executor,
            clock: deps.clock,
            locks: ActorLocks::new(),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn completions(&self) -> &Arc<DailyCompletionSet> {
        &self.completions
    }

    pub fn ledger(&self) -> &Arc<LedgerAdapter> {
        &self.ledger
    }

    pub fn locks(&self) -> &ActorLocks {
        &self.locks
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Persist sessions and completions for file-backed stores.
    pub fn flush(&self) -> rc_domain::error::Result<()> {
        self.sessions.flush()?;
        self.completions.flush()
    }

    /// Handle one inbound event and return what to send back.
    ///
    /// Never fails: every error is turned into a reply here.
    pub async fn handle(&self, event: InboundEvent) -> Vec<Outbound> {
        let actor_id = event.actor_id;
        let _permit = match self.locks.acquire(actor_id).await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::error!(actor_id, error = %e, "actor lock unavailable");
                return vec![Outbound::reply(messages::generic_failure())];
            }
        };

        let now = self.clock.now();
        let session = self.load(actor_id, now);

        let input = match gate::check(&session, &event) {
            GateDecision::Admit(input) => input,
            GateDecision::Reject(rejection) => return self.rejected(&session, &event, rejection),
        };

        let input_kind = input.kind();
        let ctx = self.context(actor_id, now);
        let Transition {
            session: mut proposed,
            effects,
        } = machine::transition(&session, input, &ctx);

        match self.executor.execute(&mut proposed, effects, now).await {
            Ok(outbound) => {
                self.commit(&session, proposed, &input_kind);
                outbound
            }
            Err(failure) => vec![self.failed(&session, &input_kind, failure)],
        }
    }

    /// The actor's session, or a fresh `IDLE` one.  A session from an
    /// earlier local day is discarded first.
    fn load(&self, actor_id: ActorId, now: DateTime<Utc>) -> ActorSession {
        match self.sessions.get(actor_id) {
            Some(existing) if is_stale(&existing, now, self.tz) => {
                self.sessions.delete(actor_id);
                TraceEvent::SessionDiscarded {
                    actor_id,
                    state: existing.state.as_str().to_owned(),
                    reason: "previous_day".into(),
                }
                .emit();
                ActorSession::new(actor_id, now)
            }
            Some(existing) => existing,
            None => ActorSession::new(actor_id, now),
        }
    }

    fn context(&self, actor_id: ActorId, now: DateTime<Utc>) -> Context {
        let local = now.with_timezone(&self.tz);
        let today = local.date_naive();
        Context {
            now,
            today,
            local_time: local.time(),
            exempt: self.protocol.is_exempt(actor_id),
            completed_today: self.completions.completed_on(actor_id, today),
            window: self.window,
        }
    }

    fn commit(&self, before: &ActorSession, after: ActorSession, input_kind: &str) {
        if after == *before {
            return;
        }
        if after.state != before.state {
            tracing::debug!(
                actor_id = after.actor_id,
                from = before.state.as_str(),
                to = after.state.as_str(),
                registration_id = ?after.registration_id,
                "session transition"
            );
            TraceEvent::SessionTransition {
                actor_id: after.actor_id,
                from: before.state.as_str().to_owned(),
                to: after.state.as_str().to_owned(),
                input: input_kind.to_owned(),
            }
            .emit();
        }
        self.sessions.put(after);
    }

    fn rejected(
        &self,
        session: &ActorSession,
        event: &InboundEvent,
        rejection: Rejection,
    ) -> Vec<Outbound> {
        let actor_id = session.actor_id;
        let state = session.state.as_str();
        match rejection {
            Rejection::Ignore => {
                tracing::debug!(actor_id, chat = ?event.chat, "ignoring non-private chat");
                Vec::new()
            }
            Rejection::Validation(out) => {
                tracing::debug!(
                    actor_id,
                    state,
                    kind = event.payload.kind(),
                    failure = FailureKind::Validation.as_str(),
                    "input rejected"
                );
                vec![out]
            }
            Rejection::StaleAction(out) => {
                TraceEvent::StaleActionRejected {
                    actor_id,
                    state: state.to_owned(),
                }
                .emit();
                vec![out]
            }
            Rejection::Reminder(out) => vec![out],
        }
    }

    fn failed(&self, session: &ActorSession, input_kind: &str, failure: EffectFailure) -> Outbound {
        let actor_id = session.actor_id;
        let state = session.state.as_str();
        let kind = failure.kind();

        match (&failure.error, kind) {
            (Error::Consistency { registration_id }, _) => {
                tracing::error!(
                    actor_id,
                    state,
                    %registration_id,
                    stage = failure.stage.as_str(),
                    "registration lost its ledger row, dropping session"
                );
                self.sessions.delete(actor_id);
                TraceEvent::ConsistencyFailure {
                    actor_id,
                    registration_id: *registration_id,
                }
                .emit();
            }
            (_, FailureKind::Transient) => {
                tracing::warn!(
                    actor_id,
                    state,
                    input = input_kind,
                    stage = failure.stage.as_str(),
                    error = %failure.error,
                    "effect failed after retries"
                );
            }
            _ => {
                tracing::error!(
                    actor_id,
                    state,
                    input = input_kind,
                    stage = failure.stage.as_str(),
                    error = %failure.error,
                    "unclassified failure"
                );
            }
        }

        failure.reply(session)
    }
}
