//! Logging setup
//!
//! The crate logs through the `log` facade. Binaries call [`init_logging`]
//! once at startup; `RUST_LOG` still overrides the configured level.

use log::LevelFilter;

/// Initialize `env_logger` with second-resolution timestamps
pub fn init_logging(level: LevelFilter) {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(level)
        .parse_default_env()
        .init()
}
