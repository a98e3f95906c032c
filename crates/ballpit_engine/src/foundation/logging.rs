//! Logging utilities and structured logging support
//!
//! The engine only ever talks to the `log` facade. Hosts call one of the
//! `init` functions once at startup to install `env_logger`.

pub use log::{debug, info, warn, error, trace};

use crate::core::config::EngineConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default filter (e.g. `"info"` or `"ballpit_engine=debug"`)
///
/// `RUST_LOG` still wins when it is set. Calling this twice is harmless; the
/// second call is ignored.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

/// Initialize logging from the engine section of the application config
pub fn init_from_config(config: &EngineConfig) {
    init_with_level(&config.log_level);
}
