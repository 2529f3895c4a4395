//! Application startup and lifecycle management.

use crate::config::Config;
use crate::services::{
    database, JwtService, PgPersonalScheduleRepository, PgPsCourseRepository, PgTodoRepository,
    PgUserRepository, UcsbCurriculumClient,
};
use crate::{build_router, AppState};
use axum::Router;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to PostgreSQL, apply migrations and bind the listener.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let pool = database::create_pool(&config.database).await?;
        database::run_migrations(&pool).await?;

        let jwt = JwtService::new(&config.auth.jwt_secret).map_err(AppError::ConfigError)?;
        let curriculum = UcsbCurriculumClient::new(&config.curriculum)?;

        let state = AppState {
            config: config.clone(),
            db: Some(pool.clone()),
            jwt,
            users: Arc::new(PgUserRepository::new(pool.clone())),
            personal_schedules: Arc::new(PgPersonalScheduleRepository::new(pool.clone())),
            ps_courses: Arc::new(PgPsCourseRepository::new(pool.clone())),
            todos: Arc::new(PgTodoRepository::new(pool)),
            curriculum: Arc::new(curriculum),
        };

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid server address: {}", e))
            })?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Port the server is listening on (useful when configured with port 0).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!(port = self.port, "courses-service listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
