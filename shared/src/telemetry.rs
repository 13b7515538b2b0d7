use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: `RUST_LOG` filter (default `info`) and compact output.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(service_name: &'static str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    tracing::info!(service = service_name, "Logging initialized");

    Ok(())
}

/// Serves Prometheus metrics on `0.0.0.0:{port}/metrics`.
///
/// The submit service reports:
/// - `submissions.accepted`, `submissions.rejected`, `submissions.malformed` and
///   `submissions.store_failed` counters, one per request outcome
/// - `store.create_record` histogram, seconds spent in the record store call
pub fn init_metrics(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(addr = %addr, "Prometheus exporter listening at http://{}/metrics", addr);

    Ok(())
}

pub fn record_timing(metric_name: &'static str, duration_secs: f64) {
    metrics::histogram!(metric_name).record(duration_secs);
}

pub fn record_counter(metric_name: &'static str, value: u64) {
    metrics::counter!(metric_name).increment(value);
}
