//! Process-wide tracing subscriber.
//!
//! `RUST_LOG` picks the filter. `POLLA_LOG_FORMAT=pretty` swaps the JSON lines
//! for human-readable output during local development.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,polla_backend=info,actix_web=info,sqlx=warn,sea_orm=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

fn log_format(raw: Option<&str>) -> LogFormat {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("pretty") | Some("text") => LogFormat::Pretty,
        _ => LogFormat::Json,
    }
}

pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format(env::var("POLLA_LOG_FORMAT").ok().as_deref()) {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_ansi(false),
            )
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_unless_asked_for_pretty() {
        assert_eq!(log_format(None), LogFormat::Json);
        assert_eq!(log_format(Some("JSON")), LogFormat::Json);
        assert_eq!(log_format(Some(" Pretty ")), LogFormat::Pretty);
        assert_eq!(log_format(Some("banana")), LogFormat::Json);
    }
}
