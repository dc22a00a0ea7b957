//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use log::LevelFilter;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default level; `RUST_LOG` still takes precedence
///
/// Unknown level names fall back to `info`. Calling this twice is harmless,
/// the second initialization is ignored.
pub fn init_with_level(level: &str) {
    let filter = parse_level(level);
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .try_init();
}

/// Parse a level name as written in configuration files
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}
