//! Logger setup for the `log` facade.
//!
//! In the browser records go to the devtools console via `console_log`, and
//! panics are forwarded there too. On the host `env_logger` is used and
//! `RUST_LOG` overrides the configured level.

use std::sync::Once;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: log::Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: log::Level::Info,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config.level);
        log::debug!("logging initialized");
    });
}

#[cfg(target_arch = "wasm32")]
fn install(level: log::Level) {
    console_error_panic_hook::set_once();
    // another logger may already be registered by the embedding page
    console_log::init_with_level(level).ok();
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: log::Level) {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => builder.parse_filters(&filter),
        Err(_) => builder.filter_level(level.to_level_filter()),
    };
    builder.try_init().ok();
}
