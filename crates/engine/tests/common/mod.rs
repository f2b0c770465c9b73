//! Shared wiring for the engine scenarios: in-memory ledger, blob source
//! and object store, plus a manual clock pinned to Lima local time.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use rc_domain::clock::ManualClock;
use rc_domain::config::ProtocolConfig;
use rc_domain::event::{ActorId, InboundEvent, Outbound};
use rc_domain::record::Column;
use rc_domain::retry::RetryPolicy;
use rc_engine::{DailyResetScheduler, Engine, EngineDeps};
use rc_ledger::{LedgerAdapter, LedgerStore, MemoryLedger};
use rc_media::{MediaPipeline, MemoryBlobSource, MemoryObjectStore, PassthroughCodec};
use rc_sessions::{ActorSession, DailyCompletionSet, MemorySessionStore, ProtocolState, SessionStore};

pub const ACTOR: ActorId = 42;
pub const EXEMPT_ACTOR: ActorId = 7175478712;

/// Local Lima wall-clock time on 2026-05-04 (plus `day_offset` days).
pub fn lima(day_offset: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    chrono_tz::America::Lima
        .with_ymd_and_hms(2026, 5, 4 + day_offset, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub struct Harness {
    pub engine: Engine,
    pub clock: Arc<ManualClock>,
    pub sheet: Arc<MemoryLedger>,
    pub ledger: Arc<LedgerAdapter>,
    pub blobs: Arc<MemoryBlobSource>,
    pub objects: Arc<MemoryObjectStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub completions: Arc<DailyCompletionSet>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(MemoryLedger::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(DailyCompletionSet::new()),
        )
    }

    pub fn with_stores(
        sheet: Arc<MemoryLedger>,
        sessions: Arc<dyn SessionStore>,
        completions: Arc<DailyCompletionSet>,
    ) -> Self {
        let store: Arc<dyn LedgerStore> = sheet.clone();
        Self::wire(store, sheet, sessions, completions)
    }

    /// Wire the engine over an arbitrary ledger store.  `sheet` is kept for
    /// fault injection and is unused when `store` is something else.
    pub fn wire(
        store: Arc<dyn LedgerStore>,
        sheet: Arc<MemoryLedger>,
        sessions: Arc<dyn SessionStore>,
        completions: Arc<DailyCompletionSet>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(lima(0, 8, 0)));
        let protocol = ProtocolConfig::default();
        let ledger = Arc::new(LedgerAdapter::new(
            store,
            RetryPolicy::immediate(3),
            "Registros",
        ));
        let blobs = Arc::new(MemoryBlobSource::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let media = Arc::new(MediaPipeline::new(
            blobs.clone(),
            objects.clone(),
            Arc::new(PassthroughCodec),
            ledger.clone(),
            RetryPolicy::immediate(3),
            4,
            protocol.tz(),
        ));

        let engine = Engine::new(EngineDeps {
            protocol,
            sessions: sessions.clone(),
            completions: completions.clone(),
            ledger: ledger.clone(),
            media,
            clock: clock.clone(),
        });

        Self {
            engine,
            clock,
            sheet,
            ledger,
            blobs,
            objects,
            sessions,
            completions,
        }
    }

    pub fn scheduler(&self) -> DailyResetScheduler {
        DailyResetScheduler::new(
            self.sessions.clone(),
            self.completions.clone(),
            self.clock.clone(),
            self.engine.tz(),
        )
    }

    pub async fn send(&self, event: InboundEvent) -> Vec<Outbound> {
        self.engine.handle(event).await
    }

    /// Send and expect exactly one reply.
    pub async fn one(&self, event: InboundEvent) -> Outbound {
        let mut out = self.send(event).await;
        assert_eq!(out.len(), 1, "expected one reply, got {out:?}");
        out.remove(0)
    }

    pub fn session(&self, actor: ActorId) -> Option<ActorSession> {
        self.sessions.get(actor)
    }

    pub fn state(&self, actor: ActorId) -> ProtocolState {
        self.session(actor).map(|s| s.state).unwrap_or_default()
    }

    pub async fn record(&self, actor: ActorId) -> BTreeMap<Column, String> {
        let id = self
            .session(actor)
            .and_then(|s| s.registration_id)
            .expect("registration id");
        self.ledger.read_record(id).await.unwrap().expect("ledger row")
    }

    /// Walk `actor` from `IDLE` to `ON_SHIFT`.  Returns the last reply.
    pub async fn start_shift(&self, actor: ActorId, crew: &str) -> Outbound {
        self.one(InboundEvent::text(actor, "/ingreso")).await;
        let out = self.one(InboundEvent::text(actor, crew)).await;
        let out = self.one(InboundEvent::button(actor, token(&out, "Confirmar"))).await;
        let out = self.one(InboundEvent::button(actor, token(&out, "REGULAR"))).await;
        self.one(InboundEvent::button(actor, token(&out, "Confirmar"))).await;

        let start_ref = format!("start_{actor}");
        self.blobs.insert(&start_ref, b"start-photo".to_vec());
        let out = self.one(InboundEvent::photo(actor, start_ref)).await;
        self.one(InboundEvent::button(actor, token(&out, "Confirmar"))).await;
        self.one(InboundEvent::live_location(actor, -12.046374, -77.042793))
            .await
    }

    /// Walk `actor` from `ON_SHIFT` to `COMPLETED`.
    pub async fn finish_shift(&self, actor: ActorId) -> Outbound {
        self.one(InboundEvent::text(actor, "/salida")).await;
        let end_ref = format!("end_{actor}");
        self.blobs.insert(&end_ref, b"end-photo".to_vec());
        let out = self.one(InboundEvent::photo(actor, end_ref)).await;
        self.one(InboundEvent::button(actor, token(&out, "Confirmar"))).await;
        self.one(InboundEvent::live_location(actor, -12.1, -77.03)).await
    }
}

/// Token of the button whose label contains `label`.
pub fn token(out: &Outbound, label: &str) -> String {
    out.keyboard()
        .and_then(|k| k.buttons.iter().find(|b| b.label.contains(label)))
        .map(|b| b.token.clone())
        .unwrap_or_else(|| panic!("no {label:?} button in {out:?}"))
}
