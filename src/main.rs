mod access;
mod actor_framework;
mod app_system;
mod bot;
mod catalog;
mod clients;
mod config;
mod domain;
mod notify;
mod orders;
mod transport;
mod wizard;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use std::error::Error;
use std::sync::Arc;

use tracing::{error, info};

use crate::app_system::{setup_tracing, ShopSystem};
use crate::config::AppConfig;
use crate::transport::{run_console, ConsoleMessenger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    info!(admin_id = %config.admin_id, "Configuration loaded");

    let system = ShopSystem::start(&config, Arc::new(ConsoleMessenger::new()));

    let result = run_console(system.bot()).await;
    if let Err(e) = &result {
        error!(error = %e, "Console transport failed");
    }

    system.shutdown().await?;
    result?;

    info!("Bot stopped");
    Ok(())
}
