//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable selecting JSON log output
pub const LOG_JSON_ENV: &str = "SUNGLOBE_LOG_JSON";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// `SUNGLOBE_LOG_JSON=1` (or `true`) selects JSON
    pub fn from_env() -> Self {
        match std::env::var(LOG_JSON_ENV).as_deref() {
            Ok("1") | Ok("true") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
///
/// Logs go to stderr so they do not interleave with the frame sink on stdout.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}
