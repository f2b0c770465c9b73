use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::event::ActorId;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Protocol
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Attendance protocol rules: which calendar the day boundary follows,
/// who is exempt from the same-day lockout, and when a new registration
/// may be started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// IANA timezone name. The day boundary (lockout, reset) is local
    /// midnight in this zone.
    #[serde(default = "d_timezone")]
    pub timezone: String,
    /// Actors that may register more than once per day (test accounts).
    #[serde(default = "d_exempt_actors")]
    pub exempt_actors: Vec<ActorId>,
    /// Earliest local time (`HH:MM`) at which `/ingreso` is accepted.
    #[serde(default = "d_window_start")]
    pub window_start: String,
    /// Latest local time (`HH:MM`, inclusive) at which `/ingreso` is accepted.
    #[serde(default = "d_window_end")]
    pub window_end: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            timezone: d_timezone(),
            exempt_actors: d_exempt_actors(),
            window_start: d_window_start(),
            window_end: d_window_end(),
        }
    }
}

impl ProtocolConfig {
    /// Resolved timezone; unknown names fall back to UTC (reported by
    /// `Config::validate`).
    pub fn tz(&self) -> chrono_tz::Tz {
        parse_tz(&self.timezone)
    }

    pub fn is_exempt(&self, actor_id: ActorId) -> bool {
        self.exempt_actors.contains(&actor_id)
    }

    /// Start window; an unparsable bound falls back to the whole day.
    pub fn window(&self) -> TimeWindow {
        let start = parse_hhmm(&self.window_start).unwrap_or(NaiveTime::MIN);
        let end = parse_hhmm(&self.window_end).unwrap_or_else(end_of_day);
        TimeWindow { start, end }
    }
}

/// Parse an IANA timezone name, defaulting to UTC.
pub fn parse_tz(tz: &str) -> chrono_tz::Tz {
    tz.parse::<chrono_tz::Tz>().unwrap_or(chrono_tz::UTC)
}

pub(crate) fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Time window
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Inclusive local time-of-day range, minute resolution.  When `start` is
/// after `end` the window wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn contains(&self, at: NaiveTime) -> bool {
        let minute = |t: NaiveTime| t.hour() * 60 + t.minute();
        let (s, e, t) = (minute(self.start), minute(self.end), minute(at));
        if s <= e {
            s <= t && t <= e
        } else {
            t >= s || t <= e
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_timezone() -> String {
    "America/Lima".into()
}
fn d_exempt_actors() -> Vec<ActorId> {
    vec![7175478712, 7286377190]
}
fn d_window_start() -> String {
    "00:00".into()
}
fn d_window_end() -> String {
    "23:59".into()
}
