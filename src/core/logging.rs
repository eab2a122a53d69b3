//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```no_run
/// flightsim::core::logging::init();
/// log::info!("Simulation started");
/// ```
pub fn init() {
    init_with_default("info");
}

/// Initialize logging with a custom default filter and millisecond timestamps.
///
/// Used by the binaries, where per-tick telemetry is easier to read with a
/// finer timestamp. `RUST_LOG` still takes precedence. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter)
    )
    .format_timestamp_millis()
    .try_init();
}
