use std::io;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Installs the global subscriber. Our own crates log at `level`, dependencies at WARN.
/// Output goes to stderr so the JSON report on stdout stays clean.
pub(crate) fn setup_tracing(level: LevelFilter) {
    let filter_layer = tracing_subscriber::filter::filter_fn(move |metadata| {
        let is_prt = metadata.target().starts_with("prt");
        if is_prt {
            metadata.level() <= &level
        } else {
            metadata.level() <= &Level::WARN
        }
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter_layer))
        .try_init();
}

pub(crate) fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
