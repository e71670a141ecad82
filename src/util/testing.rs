use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

static TEST_SETUP: Once = Once::new();

/// One-time test logging bootstrap, shared by all integration tests.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
