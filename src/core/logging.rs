//! Logging initialization
//!
//! Only binaries install a logger. The library logs through the `log` facade.

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Initialize env_logger with the [`DEFAULT_FILTER`].
///
/// # Example
/// ```no_run
/// campsite::core::logging::init();
/// log::info!("Scene assembled");
/// ```
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize env_logger with `filter` unless `RUST_LOG` overrides it.
///
/// A second call is ignored instead of panicking.
pub fn init_with_filter(filter: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
