//! Minimal tracing subscriber for integration tests, mirroring
//! `initialize_default_error_tracing`'s try-init-and-warn-on-already-set
//! shape so parallel test threads racing to install it don't panic.

use tracing_subscriber::prelude::*;

pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();

    if let Err(err) = init_result {
        tracing::trace!(error = %err, "tracing already initialized for this test binary");
    }
}
