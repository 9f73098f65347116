use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "DRONE_OBSERVE_LOG";
const DEFAULT_DIRECTIVE: &str = "drone_observe=warn";

static INIT: Once = Once::new();

/// Install the stderr subscriber once. `DRONE_OBSERVE_LOG` takes
/// `EnvFilter` directives, e.g. `drone_observe_core=debug`; anything missing
/// or invalid falls back to warnings from this workspace only.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
