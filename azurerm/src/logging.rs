//! Log setup for the provider
//!
//! Stdout belongs to the plugin protocol, so everything goes to stderr.
//! [`init`] runs when the provider is configured; hosts may call it earlier.

use tracing::level_filters::LevelFilter;

/// Maps a `TF_LOG` value onto a level filter
pub fn level_from_tf_log(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("trace") | Some("json") => LevelFilter::TRACE,
        Some("debug") => LevelFilter::DEBUG,
        Some("warn") => LevelFilter::WARN,
        Some("error") => LevelFilter::ERROR,
        Some("off") => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let level = level_from_tf_log(std::env::var("TF_LOG").ok().as_deref());

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tf_log_levels_map_to_filters() {
        assert_eq!(level_from_tf_log(Some("DEBUG")), LevelFilter::DEBUG);
        assert_eq!(level_from_tf_log(Some("json")), LevelFilter::TRACE);
        assert_eq!(level_from_tf_log(Some(" warn ")), LevelFilter::WARN);
        assert_eq!(level_from_tf_log(Some("verbose")), LevelFilter::INFO);
        assert_eq!(level_from_tf_log(None), LevelFilter::INFO);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init();
    }
}
