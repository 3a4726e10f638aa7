//! wasm-devserver
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!     Browser request      │                 wasm-devserver                │
//!     ─────────────────────┼─▶ http::server ──▶ routing::Dispatcher         │
//!                          │                    │                          │
//!                          │        ┌───────────┼─────────────┐            │
//!                          │        ▼           ▼             ▼            │
//!                          │   static_files   proxy::handler  405 / 501    │
//!                          │   (ServeDir)     │                            │
//!                          │                  ▼                            │
//!                          │            proxy::client ───────────────────┼──▶ upstream API
//!                          │                                               │
//!     Browser response     │   security::headers (COOP + COEP, sealed)     │
//!     ◀────────────────────┼───────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use wasm_devserver::config::{load_config, CliArgs};
use wasm_devserver::lifecycle::{self, signals, Shutdown};
use wasm_devserver::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.log_filter.as_deref());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wasm-devserver starting");

    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    match lifecycle::run(config, signal).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
