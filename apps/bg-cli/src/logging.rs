use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CliError, CliResult};

/// Install a stderr subscriber.
///
/// The level is taken from `RUST_LOG` (e.g. `RUST_LOG=bg_compose=debug`) and
/// defaults to `info`. Stdout stays reserved for command output.
pub fn init() -> CliResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
