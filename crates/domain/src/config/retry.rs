use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    None,
    #[default]
    Linear,
    Exponential,
}

/// Applies to every network-bound step: blob download, object upload and
/// ledger calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "d_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub backoff: BackoffKind,
    #[serde(default = "d_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Per-attempt timeout.
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: d_max_attempts(),
            backoff: BackoffKind::default(),
            base_delay_ms: d_base_delay_ms(),
            timeout_ms: d_timeout_ms(),
        }
    }
}

fn d_max_attempts() -> u32 {
    3
}
fn d_base_delay_ms() -> u64 {
    2000
}
fn d_timeout_ms() -> u64 {
    20_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_defaults() {
        let cfg: RetryConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.backoff, BackoffKind::Linear);
        assert_eq!(cfg.base_delay_ms, 2000);
        assert_eq!(cfg.timeout_ms, 20_000);
    }

    #[test]
    fn exponential_backoff_parses() {
        let cfg: RetryConfig = toml::from_str(
            r#"
            backoff = "exponential"
            base_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backoff, BackoffKind::Exponential);
        assert_eq!(cfg.base_delay_ms, 250);
    }
}
