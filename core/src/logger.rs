//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use env_logger::fmt::style::Style;
use log::info;
use once_cell::sync::Lazy;
use tracing_subscriber::{EnvFilter, Layer as _, fmt::format::FmtSpan, layer::SubscriberExt as _};

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Environment variable holding the filter for `tracing` spans, e.g. `aurca_storage=trace`.
pub const TRACE_ENV_VAR: &str = "AURCA_TRACE";

/// The single letter a level is printed as.
#[must_use]
pub const fn level_letter(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `aurca`.
/// If `RUST_LOG` is set it is used as-is, otherwise every crate outside of aurca is silenced.
///
/// Functionality is provided by [`log`].
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter) {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    let env = std::env::var("RUST_LOG").ok().filter(|e| !e.is_empty());

    let mut builder = env_logger::Builder::new();
    match &env {
        Some(e) => builder.parse_filters(e),
        None => builder
            .filter_level(log::LevelFilter::Off)
            .filter_module("aurca", filter),
    };

    builder
        .format(move |buf, record| {
            let level_style = buf.default_level_style(record.level()).bold();
            let dimmed = Style::new().dimmed();
            writeln!(
                buf,
                // Longest PATH in the repo: `storage/src/db/schemas/payload.rs` - `33` characters
                // Longest file in the repo: `storage/src/db/schemas/payload.rs` - `3` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {level_style}{}{level_style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >33} @ {: <3}{dimmed:#} | {}",
                level_letter(record.level()),
                crate::format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    match env {
        Some(env) => info!("Log Level (RUST_LOG) ... {env}"),
        None => info!("Log Level (Flag) ... {filter}"),
    }
}

/// Initializes the tracing layer.
///
/// Spans (e.g. the storage CRUD operations) are reported when they close, filtered by
/// [`TRACE_ENV_VAR`]. Nothing is reported when it is unset.
#[must_use]
pub fn init_tracing() -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_env(TRACE_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_filter(filter),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(log::Level::Error, "E")]
    #[case(log::Level::Warn, "W")]
    #[case(log::Level::Info, "I")]
    #[case(log::Level::Debug, "D")]
    #[case(log::Level::Trace, "T")]
    fn test_level_letter(#[case] level: log::Level, #[case] expected: &str) {
        assert_eq!(level_letter(level), expected);
    }

    #[test]
    fn test_tracing_subscriber_can_be_scoped() {
        let subscriber = init_tracing();
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("scoped");
            let _guard = span.enter();
        });
    }
}
