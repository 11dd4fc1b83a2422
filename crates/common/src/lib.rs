pub mod config;
pub mod http;
pub mod logging;
pub mod retry;
pub mod telemetry;

pub use config::{Environment, LogLevel};
pub use http::{FetchError, HttpSettings, Location, build_client, fetch_bytes, fetch_text};
pub use logging::setup_logging;
pub use retry::{RetryPolicy, RetrySettings, retry_with_backoff};
pub use telemetry::TelemetryGuard;
