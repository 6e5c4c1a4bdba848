//! # Material Chat
//!
//! Chatroom REST API server.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - HTTP server

use anyhow::Result;
use tracing::info;

use material_chat::config::Settings;
use material_chat::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    material_chat::telemetry::init_tracing();

    info!("Starting Material Chat...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    info!("Server stopped");
    Ok(())
}
