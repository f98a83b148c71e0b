//! Tracing setup for `n2c2-eval`.
//!
//! Log lines go to stderr; stdout carries the score table.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter built from `RUST_LOG`, falling back to `level` for anything the
/// variable does not mention. Unparsable directives are dropped.
pub fn log_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install the global subscriber: plain text, or one JSON object per line.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(log_filter(level))
        .with(text_layer)
        .with(json_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_requested_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter(Level::WARN).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Level::DEBUG).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
    }
}
