use crate::config::{TestSettings, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that writes through the test harness.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the configured
/// default (`EVENTWATCH_LOG`, falling back to `warn`). Output is captured per
/// test like `println!`. Only the first call in a process installs anything;
/// later calls, and calls after another subscriber was installed, do nothing.
pub fn init_test_logging() {
    let default_filter = TestSettings::from_env()
        .map(|settings| settings.log_filter().to_string())
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
