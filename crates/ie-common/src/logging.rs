//! Structured Logging Configuration
//!
//! - JSON output for log aggregation (`format = "json"` or `LOG_FORMAT=json`)
//! - Plain text otherwise, without ANSI colours so CloudWatch stays readable
//! - `RUST_LOG` takes precedence over the configured default level
//!
//! Invocation context (user name, request id) is attached through spans:
//!
//! ```rust,ignore
//! let span = tracing::info_span!("resolve", user_name = %request.user_name);
//! resolver.resolve(&request).instrument(span).await?;
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// "json" (any case) selects JSON, anything else falls back to text.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Build the level filter: `RUST_LOG` if set and valid, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging for the given service.
///
/// Must be called once per process, before the first invocation.
pub fn init_logging(service_name: &str, format: LogFormat, default_level: &str) {
    let filter = env_filter(default_level);

    match format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Text => init_text_logging(filter),
    }

    tracing::debug!(service = service_name, ?format, "Logging initialized");
}

fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_target(true)
                .flatten_event(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .init();
}

fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(false),
        )
        .init();
}
