//! Midnight reset.
//!
//! At local midnight the session store and the daily completion set are
//! emptied.  The ledger is never touched.  A transition racing the reset may
//! write its session back after the clear; that session carries the
//! previous day's `created_at` and is discarded on the actor's next event.

use std::sync::Arc;

use chrono_tz::Tz;

use rc_domain::clock::Clock;
use rc_domain::trace::TraceEvent;
use rc_sessions::{next_local_midnight, DailyCompletionSet, SessionStore};

pub struct DailyResetScheduler {
    sessions: Arc<dyn SessionStore>,
    completions: Arc<DailyCompletionSet>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

/// Counts of what one reset removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub sessions_cleared: usize,
    pub completions_cleared: usize,
}

impl DailyResetScheduler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        completions: Arc<DailyCompletionSet>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            sessions,
            completions,
            clock,
            tz,
        }
    }

    /// Clear both stores immediately.
    pub fn reset_now(&self) -> ResetReport {
        let report = ResetReport {
            sessions_cleared: self.sessions.clear(),
            completions_cleared: self.completions.clear(),
        };

        if let Err(e) = self.sessions.flush() {
            tracing::warn!(error = %e, "session flush after reset failed");
        }
        if let Err(e) = self.completions.flush() {
            tracing::warn!(error = %e, "completion flush after reset failed");
        }

        TraceEvent::DailyReset {
            sessions_cleared: report.sessions_cleared,
            completions_cleared: report.completions_cleared,
        }
        .emit();
        report
    }

    /// Time until the next local midnight.
    pub fn until_next(&self) -> std::time::Duration {
        let now = self.clock.now();
        let next = next_local_midnight(now, self.tz);
        (next - now).to_std().unwrap_or_default()
    }

    /// Sleep until each local midnight and reset.  Runs until the task is
    /// dropped.
    pub async fn run(self: Arc<Self>) {
        loop {
            let wait = self.until_next();
            tracing::info!(
                timezone = %self.tz,
                in_secs = wait.as_secs(),
                "next daily reset scheduled"
            );
            tokio::time::sleep(wait).await;
            let report = self.reset_now();
            tracing::info!(
                sessions = report.sessions_cleared,
                completions = report.completions_cleared,
                "daily reset complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rc_domain::clock::ManualClock;
    use rc_sessions::{ActorSession, MemorySessionStore};

    fn scheduler(at: chrono::DateTime<Utc>) -> (DailyResetScheduler, Arc<MemorySessionStore>, Arc<DailyCompletionSet>) {
        let sessions = Arc::new(MemorySessionStore::new());
        let completions = Arc::new(DailyCompletionSet::new());
        let sched = DailyResetScheduler::new(
            sessions.clone(),
            completions.clone(),
            Arc::new(ManualClock::new(at)),
            chrono_tz::America::Lima,
        );
        (sched, sessions, completions)
    }

    #[test]
    fn reset_clears_both_stores() {
        let now = Utc.with_ymd_and_hms(2026, 5, 5, 4, 59, 0).unwrap();
        let (sched, sessions, completions) = scheduler(now);
        sessions.put(ActorSession::new(1, now));
        sessions.put(ActorSession::new(2, now));
        completions.mark(1, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap());

        let report = sched.reset_now();
        assert_eq!(
            report,
            ResetReport {
                sessions_cleared: 2,
                completions_cleared: 1
            }
        );
        assert!(sessions.is_empty());
        assert!(completions.is_empty());
    }

    #[test]
    fn next_reset_is_one_minute_away_at_2359() {
        // 23:59 Lima.
        let now = Utc.with_ymd_and_hms(2026, 5, 5, 4, 59, 0).unwrap();
        let (sched, _, _) = scheduler(now);
        assert_eq!(sched.until_next(), std::time::Duration::from_secs(60));
    }
}
