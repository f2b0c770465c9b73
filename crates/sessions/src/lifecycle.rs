//! Day-boundary helpers.
//!
//! The protocol day runs from local midnight to local midnight in the
//! configured timezone.  A session created on an earlier local date is stale
//! and is discarded on next access, whether or not the scheduled reset has
//! fired yet.

use chrono::{DateTime, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::session::ActorSession;

/// The local calendar date of `at`.
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Whether `session` belongs to an earlier local day than `now`.
pub fn is_stale(session: &ActorSession, now: DateTime<Utc>, tz: Tz) -> bool {
    local_date(session.created_at, tz) < local_date(now, tz)
}

/// The first instant strictly after `after` at which the local date changes.
///
/// Zones that skip midnight on a DST change get the first existing local
/// instant of the new day.
pub fn next_local_midnight(after: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let mut day = local_date(after, tz);
    // A bounded walk: a zone never skips more than one day.
    for _ in 0..3 {
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
        if let Some(start) = start_of_day(day, tz) {
            if start > after {
                return start;
            }
        }
    }
    after + chrono::Duration::days(1)
}

fn start_of_day(day: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    // Scan forward in 15-minute steps past a DST gap at midnight.
    for offset in 0..=8 {
        let candidate = midnight + chrono::Duration::minutes(15 * offset);
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest.with_timezone(&Utc)),
            LocalResult::None => {}
        }
    }
    None
}
