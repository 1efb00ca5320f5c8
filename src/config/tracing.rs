use super::LogFormat;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

pub const DEFAULT_FILTER: &str = "info,roster=debug,tower_http=debug";

/// Installs the global subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`].
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => info!("Tracing initialized ({} format)", format),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init_tracing(LogFormat::Json);
        init_tracing(LogFormat::Pretty);
    }
}
