//! HTTP host for the directive router

pub mod directive;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::router::DirectiveRouter;

/// Shared state for API handlers
#[derive(Debug)]
pub struct ApiState {
    pub router: DirectiveRouter,
}

/// Build the router with all routes
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(directive::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state))
        .layer(TraceLayer::new_for_http())
}

/// API server
#[derive(Debug)]
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(router: DirectiveRouter, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState { router }),
            port,
        }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            port = self.port,
            devices = self.state.router.registry().len(),
            "API server listening"
        );

        axum::serve(listener, app(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
