//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize logging with a fallback level.
///
/// `RUST_LOG` still wins when it is set; `level` only fills in when the
/// environment says nothing. Unknown level strings fall back to `info`.
pub fn init_with_level(level: &str) {
    let fallback = level.parse::<log::LevelFilter>().unwrap_or(log::LevelFilter::Info);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(fallback);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // Fails only when a logger is already installed.
    let _ = builder.try_init();
}
