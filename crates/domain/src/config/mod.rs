mod ledger;
mod media;
mod observability;
mod protocol;
mod retry;
mod server;

pub use ledger::*;
pub use media::*;
pub use observability::*;
pub use protocol::*;
pub use retry::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Admin
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Environment variable holding the admin bearer token.
    /// If the env var is unset, admin endpoints accept any caller.
    #[serde(default = "d_admin_token_env")]
    pub token_env: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token_env: d_admin_token_env(),
        }
    }
}

fn d_admin_token_env() -> String {
    "RC_ADMIN_TOKEN".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.protocol.timezone.parse::<chrono_tz::Tz>().is_err() {
            errors.push(ConfigError::error(
                "protocol.timezone",
                format!("unknown timezone \"{}\"", self.protocol.timezone),
            ));
        }

        for (field, raw) in [
            ("protocol.window_start", &self.protocol.window_start),
            ("protocol.window_end", &self.protocol.window_end),
        ] {
            if protocol::parse_hhmm(raw).is_none() {
                errors.push(ConfigError::error(
                    field,
                    format!("\"{raw}\" is not a HH:MM time"),
                ));
            }
        }

        if self.ledger.sheet_title.trim().is_empty() {
            errors.push(ConfigError::error(
                "ledger.sheet_title",
                "sheet title must not be empty",
            ));
        }

        if self.media.blob_base_url.is_empty() {
            errors.push(ConfigError::error(
                "media.blob_base_url",
                "blob_base_url must not be empty",
            ));
        }

        if self.media.max_concurrent == 0 {
            errors.push(ConfigError::error(
                "media.max_concurrent",
                "max_concurrent must be greater than 0",
            ));
        }

        if self.retry.max_attempts == 0 {
            errors.push(ConfigError::error(
                "retry.max_attempts",
                "max_attempts must be at least 1",
            ));
        }

        if self.retry.timeout_ms == 0 {
            errors.push(ConfigError::error(
                "retry.timeout_ms",
                "every external call needs a timeout greater than 0",
            ));
        }

        if self.server.port == 0 {
            errors.push(ConfigError::error(
                "server.port",
                "port must be greater than 0",
            ));
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.ledger.backend == LedgerBackend::Memory {
            errors.push(ConfigError::warning(
                "ledger.backend",
                "memory ledger loses every registration on restart",
            ));
        }

        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            errors.push(ConfigError::warning(
                "observability.sample_rate",
                "sample_rate outside 0.0..=1.0 is clamped",
            ));
        }

        errors
    }
}
