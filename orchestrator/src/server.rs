//! HTTP server lifecycle

use axum::Router;
use shared::{component_error, component_info, logging, Component};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::OrchestratorResult;

/// Bound listener plus the router it serves
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn bind(addr: SocketAddr, router: Router) -> OrchestratorResult<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            component_error!(Component::Server, "Failed to bind to {}: {}", addr, e);
            e
        })?;
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> OrchestratorResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> OrchestratorResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> OrchestratorResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        logging::log_startup(Component::Server, &format!("listening on http://{addr}"));

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        logging::log_shutdown(Component::Server, "listener closed");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => component_info!(Component::Server, "Received shutdown signal"),
        Err(e) => {
            component_error!(Component::Server, "Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
