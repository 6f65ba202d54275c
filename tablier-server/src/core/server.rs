//! Server lifecycle
//!
//! Builds the application router, binds the listener, and runs until
//! SIGINT/SIGTERM. SIGHUP reloads the identity verification keys
//! without a restart.

use std::net::SocketAddr;

use shared::{AppError, AppResult};

use super::config::Config;
use super::state::ServerState;
use crate::api;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Run against pre-built state; used by tests
    pub fn with_state(state: ServerState) -> Self {
        Self {
            config: state.config.clone(),
            state: Some(state),
        }
    }

    pub async fn run(self) -> AppResult<()> {
        let state = match self.state {
            Some(state) => state,
            None => ServerState::initialize(&self.config).await?,
        };

        spawn_reload_handler(state.clone());

        let app = api::build_app(state.clone()).with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(
            "tablier-server listening on {} ({})",
            addr,
            self.config.environment
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::warn!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

/// SIGHUP rotates the identity verification keys
fn spawn_reload_handler(state: ServerState) {
    #[cfg(unix)]
    tokio::spawn(async move {
        let mut hangup =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Failed to install SIGHUP handler: {}", e);
                    return;
                }
            };
        while hangup.recv().await.is_some() {
            state.identity.reload();
        }
    });
    #[cfg(not(unix))]
    let _ = state;
}
