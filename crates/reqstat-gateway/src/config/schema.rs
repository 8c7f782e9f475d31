use std::net::SocketAddr;

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::sanitize::Sanitizer;
use reqstat_core::template::{MetricNamer, MetricTemplate};
use reqstat_core::token::TransformKind;
use reqstat_core::CollectorSettings;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub statsd: StatsdSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqstatError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.statsd.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ReqstatError::InvalidConfig(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Request metrics settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdSection {
    #[serde(default)]
    pub enable: bool,

    #[serde(default = "default_memory_pattern")]
    pub memory_pattern: String,

    #[serde(default = "default_timer_pattern")]
    pub timer_pattern: String,

    /// When true the sanitizer keeps `.` in token values.
    #[serde(default)]
    pub replace_dots_in_tokens: bool,

    #[serde(default = "default_replacement")]
    pub replace_special_chars_with: String,

    #[serde(default)]
    pub metric_tokens_callback: TransformKind,

    #[serde(default)]
    pub event_metrics: bool,

    #[serde(default)]
    pub statsd: StatsdEndpoint,
}

impl Default for StatsdSection {
    fn default() -> Self {
        Self {
            enable: false,
            memory_pattern: default_memory_pattern(),
            timer_pattern: default_timer_pattern(),
            replace_dots_in_tokens: false,
            replace_special_chars_with: default_replacement(),
            metric_tokens_callback: TransformKind::None,
            event_metrics: false,
            statsd: StatsdEndpoint::default(),
        }
    }
}

impl StatsdSection {
    pub fn validate(&self) -> Result<()> {
        if self.memory_pattern.trim().is_empty() {
            return Err(ReqstatError::InvalidConfig(
                "statsd.memory_pattern must not be empty".into(),
            ));
        }
        if self.timer_pattern.trim().is_empty() {
            return Err(ReqstatError::InvalidConfig(
                "statsd.timer_pattern must not be empty".into(),
            ));
        }
        self.statsd.validate()
    }

    /// Compile into the settings every per-request collector shares.
    pub fn to_settings(&self) -> CollectorSettings {
        let namer = MetricNamer::new(
            MetricTemplate::parse(self.memory_pattern.clone()),
            MetricTemplate::parse(self.timer_pattern.clone()),
            Sanitizer::new(
                self.replace_dots_in_tokens,
                self.replace_special_chars_with.clone(),
            ),
        )
        .with_transform(self.metric_tokens_callback.into_transform());

        CollectorSettings {
            enable: self.enable,
            namer,
            event_metrics: self.event_metrics,
        }
    }
}

fn default_memory_pattern() -> String {
    "app.%controller%.%http-method%.%http-code%.memory".into()
}
fn default_timer_pattern() -> String {
    "app.%controller%.%http-method%.%http-code%.time".into()
}
fn default_replacement() -> String {
    "_".into()
}

/// StatsD daemon address.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdEndpoint {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on a single datagram write.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StatsdEndpoint {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl StatsdEndpoint {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ReqstatError::InvalidConfig("statsd.statsd.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ReqstatError::InvalidConfig("statsd.statsd.port must not be 0".into()));
        }
        if !(1..=50).contains(&self.timeout_ms) {
            return Err(ReqstatError::InvalidConfig(
                "statsd.statsd.timeout_ms must be between 1 and 50".into(),
            ));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8125
}
fn default_timeout_ms() -> u64 {
    5
}
