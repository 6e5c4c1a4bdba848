//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthServiceImpl, ChatroomServiceImpl, MessageServiceImpl, PremiumServiceImpl,
    UserServiceImpl,
};
use crate::config::Settings;
use crate::domain::{ChatroomRepository, MessageRepository, UserRepository};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgChatroomRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::RateLimiter;
use crate::shared::snowflake::SnowflakeGenerator;

/// How often expired rate-limit windows are dropped
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub chatrooms: Arc<dyn ChatroomRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub rate_limiter: Arc<RateLimiter>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire state around the given stores.
    pub fn new(
        settings: Settings,
        users: Arc<dyn UserRepository>,
        chatrooms: Arc<dyn ChatroomRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        let snowflake = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.machine_id as u64,
            settings.snowflake.node_id as u64,
        ));
        let rate_limiter = Arc::new(RateLimiter::from_settings(&settings.rate_limit));

        Self {
            users,
            chatrooms,
            messages,
            snowflake,
            rate_limiter,
            settings: Arc::new(settings),
        }
    }

    pub fn auth_service(&self) -> AuthServiceImpl<dyn UserRepository> {
        AuthServiceImpl::new(
            self.users.clone(),
            self.snowflake.clone(),
            self.settings.jwt.clone(),
        )
    }

    pub fn user_service(&self) -> UserServiceImpl<dyn UserRepository> {
        UserServiceImpl::new(self.users.clone())
    }

    pub fn chatroom_service(&self) -> ChatroomServiceImpl<dyn ChatroomRepository> {
        ChatroomServiceImpl::new(
            self.chatrooms.clone(),
            self.snowflake.clone(),
            self.settings.premium.clone(),
        )
    }

    pub fn message_service(
        &self,
    ) -> MessageServiceImpl<dyn MessageRepository, dyn ChatroomRepository> {
        MessageServiceImpl::new(
            self.messages.clone(),
            self.chatrooms.clone(),
            self.snowflake.clone(),
        )
    }

    pub fn premium_service(&self) -> PremiumServiceImpl<dyn UserRepository> {
        PremiumServiceImpl::new(self.users.clone(), self.settings.premium.clone())
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database)
            .await
            .context("Failed to connect to PostgreSQL")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
        }

        let state = AppState::new(
            settings.clone(),
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgChatroomRepository::new(db.clone())),
            Arc::new(PgMessageRepository::new(db)),
        );

        spawn_rate_limit_pruner(state.rate_limiter.clone());
        health::init_server_start();

        let router = routes::create_router(state);

        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

fn spawn_rate_limit_pruner(limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = limiter.prune();
            if removed > 0 {
                tracing::debug!(removed, "Pruned expired rate limit windows");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
