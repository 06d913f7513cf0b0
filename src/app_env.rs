/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Socket address the documentation server binds to. Defaults to 0.0.0.0:8080
pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
/// Directory scanned for auxiliary documentation comment files. Defaults to the directory
/// containing the running executable, which is where build tooling drops those files
pub const DOCS_BASE_PATH: &str = "DOCS_BASE_PATH";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";
