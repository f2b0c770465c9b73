//! AppState construction and background-task spawning.
//!
//! `serve` boots everything here; `resync-headers` reuses [`build_ledger`]
//! without starting the engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use sha2::{Digest, Sha256};

use rc_domain::clock::{Clock, SystemClock};
use rc_domain::config::{Config, ConfigSeverity, LedgerBackend};
use rc_domain::error::Error;
use rc_domain::retry::RetryPolicy;
use rc_engine::{DailyResetScheduler, Engine, EngineDeps};
use rc_ledger::LedgerAdapter;
use rc_media::{DirObjectStore, HttpBlobSource, MediaPipeline, PassthroughCodec};
use rc_sessions::{DailyCompletionSet, MemorySessionStore, SessionStore};

use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    let retry = RetryPolicy::from_config(&config.retry);

    // ── Ledger ───────────────────────────────────────────────────────
    let ledger = build_ledger(&config)?;
    match ledger.verify_headers().await {
        Ok(()) => tracing::info!(sheet = %config.ledger.sheet_title, "ledger headers verified"),
        Err(Error::Schema(msg)) => tracing::error!(
            sheet = %config.ledger.sheet_title,
            error = %msg,
            "ledger headers do not match; run `rollcall resync-headers`"
        ),
        Err(e) => tracing::warn!(error = %e, "ledger header check failed, will retry on first create"),
    }

    // ── Sessions & completions ───────────────────────────────────────
    let state_path = &config.ledger.state_path;
    let (sessions, completions): (Arc<dyn SessionStore>, Arc<DailyCompletionSet>) =
        match config.ledger.backend {
            LedgerBackend::File => (
                Arc::new(MemorySessionStore::open(state_path).context("loading sessions")?),
                Arc::new(DailyCompletionSet::open(state_path).context("loading completions")?),
            ),
            LedgerBackend::Memory => (
                Arc::new(MemorySessionStore::new()),
                Arc::new(DailyCompletionSet::new()),
            ),
        };
    tracing::info!(
        sessions = sessions.len(),
        completions = completions.len(),
        "session store ready"
    );

    // ── Media pipeline ───────────────────────────────────────────────
    let source = HttpBlobSource::new(&config.media, retry.timeout)
        .context("creating blob source client")?;
    let media = Arc::new(MediaPipeline::new(
        Arc::new(source),
        Arc::new(DirObjectStore::new(&config.media)),
        Arc::new(PassthroughCodec),
        ledger.clone(),
        retry,
        config.media.max_concurrent,
        config.protocol.tz(),
    ));
    tracing::info!(
        object_dir = %config.media.object_dir.display(),
        max_concurrent = config.media.max_concurrent,
        "media pipeline ready"
    );

    // ── Engine & reset ───────────────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let engine = Arc::new(Engine::new(EngineDeps {
        protocol: config.protocol.clone(),
        sessions: sessions.clone(),
        completions: completions.clone(),
        ledger,
        media,
        clock: clock.clone(),
    }));
    let reset = Arc::new(DailyResetScheduler::new(
        sessions,
        completions,
        clock,
        config.protocol.tz(),
    ));

    // ── Tokens (read once, hash for constant-time comparison) ────────
    let api_token_hash = token_hash(&config.server.api_token_env, "API");
    let admin_token_hash = token_hash(&config.admin.token_env, "admin");

    Ok(AppState {
        config,
        engine,
        reset,
        api_token_hash,
        admin_token_hash,
        started_at: Instant::now(),
    })
}

/// Open the configured ledger store behind the retrying adapter.
pub fn build_ledger(config: &Config) -> anyhow::Result<Arc<LedgerAdapter>> {
    let store = rc_ledger::create_store(&config.ledger).context("opening ledger store")?;
    tracing::info!(
        backend = ?config.ledger.backend,
        sheet = %config.ledger.sheet_title,
        "ledger store ready"
    );
    Ok(Arc::new(LedgerAdapter::new(
        store,
        RetryPolicy::from_config(&config.retry),
        &config.ledger.sheet_title,
    )))
}

fn token_hash(env_var: &str, label: &str) -> Option<Vec<u8>> {
    match std::env::var(env_var).ok().filter(|t| !t.is_empty()) {
        Some(token) => {
            tracing::info!(source = %format!("env:{env_var}"), "{label} bearer-token auth enabled");
            Some(Sha256::digest(token.as_bytes()).to_vec())
        }
        None => {
            tracing::warn!("{label} bearer-token auth DISABLED; set the {env_var} env var");
            None
        }
    }
}

/// Spawn the periodic flush, lock pruning and the midnight reset.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Periodic state flush ─────────────────────────────────────────
    {
        let engine = state.engine.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                if let Err(e) = engine.flush() {
                    tracing::warn!(error = %e, "session state flush failed");
                }
            }
        });
    }

    // ── Idle actor-lock pruning ──────────────────────────────────────
    {
        let engine = state.engine.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                engine.locks().prune_idle();
            }
        });
    }

    // ── Daily reset at local midnight ────────────────────────────────
    tokio::spawn(state.reset.clone().run());
}
