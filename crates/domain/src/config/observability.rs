use serde::{Deserialize, Serialize};

/// `[observability]`: log filtering and optional OTLP span export.
///
/// Logs are always JSON lines on stdout.  Spans leave the process only when
/// `otlp_endpoint` names a collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// OTLP/gRPC collector, e.g. `http://localhost:4317`.
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    /// Fraction of traces kept.
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,rc_gateway=debug".into(),
            otlp_endpoint: None,
            service_name: "rollcall".into(),
            sample_rate: 1.0,
        }
    }
}

impl ObservabilityConfig {
    /// The collector to export to; a blank endpoint disables export.
    pub fn collector(&self) -> Option<&str> {
        self.otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// `sample_rate` clamped into `0.0..=1.0`; NaN keeps everything.
    pub fn sample_ratio(&self) -> f64 {
        if self.sample_rate.is_nan() {
            1.0
        } else {
            self.sample_rate.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_logs_locally_only() {
        let cfg: ObservabilityConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.collector(), None);
        assert_eq!(cfg.service_name, "rollcall");
        assert_eq!(cfg.log_filter, "info,rc_gateway=debug");
    }

    #[test]
    fn blank_endpoint_disables_export() {
        let cfg: ObservabilityConfig = toml::from_str(r#"otlp_endpoint = "  ""#).unwrap();
        assert_eq!(cfg.collector(), None);

        let cfg: ObservabilityConfig =
            toml::from_str(r#"otlp_endpoint = "http://otel:4317""#).unwrap();
        assert_eq!(cfg.collector(), Some("http://otel:4317"));
    }

    #[test]
    fn sample_ratio_is_clamped() {
        let mut cfg = ObservabilityConfig::default();
        cfg.sample_rate = 3.0;
        assert_eq!(cfg.sample_ratio(), 1.0);
        cfg.sample_rate = -0.5;
        assert_eq!(cfg.sample_ratio(), 0.0);
        cfg.sample_rate = 0.25;
        assert_eq!(cfg.sample_ratio(), 0.25);
    }
}
