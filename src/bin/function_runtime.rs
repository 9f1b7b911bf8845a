//! Function Runtime Binary
//!
//! Loads the configured handler and polls the input channel until the process
//! receives a termination signal. Any startup failure exits with status 1.

use anyhow::Context;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use function_runtime::logging::init_structured_logging;
use function_runtime::{bootstrap, handlers, RuntimeConfig, RuntimeError};

#[tokio::main]
async fn main() {
    init_structured_logging();

    if let Err(e) = run().await {
        error!(
            kind = RuntimeError::kind_of(&e),
            error = ?e,
            "❌ Function runtime failed to start"
        );
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = RuntimeConfig::load()
        .map_err(RuntimeError::from)
        .context("loading runtime configuration")?;
    let registry = handlers::builtin_registry()
        .map_err(RuntimeError::from)
        .context("registering built-in handlers")?;

    info!(
        source_type = %config.source_type,
        function_name = %config.function_name,
        input_channel = %config.input_channel,
        output_channel = %config.output_channel,
        "🚀 Starting function runtime"
    );

    let mut dispatcher = bootstrap::start(&config, Arc::new(registry))
        .await
        .context("starting function runtime")?;

    tokio::select! {
        _ = dispatcher.run() => {}
        result = signal::ctrl_c() => {
            result.context("listening for shutdown signal")?;
        }
    }

    info!(stats = ?dispatcher.stats(), "Shutdown signal received");

    Ok(())
}
