//! Tracing bootstrap shared by the binaries.

use tracing_subscriber::{EnvFilter, prelude::*};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// When a sentry client is active, events are forwarded to it as well.
pub fn init_tracing(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));

    if sentry::Hub::current().client().is_some() {
        registry.with(sentry_tracing::layer()).init();
    } else {
        registry.init();
    }
}

/// Start the sentry client if a DSN is configured. Keep the guard alive for
/// the lifetime of the process.
pub fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|d| !d.trim().is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}
