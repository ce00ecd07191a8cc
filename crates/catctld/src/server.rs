// SPDX-License-Identifier: MIT

//! rigctld TCP accept loop (C9): one task per connection, each sharing the
//! same controller and serializing at its session lock. Grounded in
//! `hdds-discovery-server::DiscoveryServer`'s accept-loop/shutdown shape.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_serial::SerialStream;
use tracing::{error, info};

use catcore::Controller;

use crate::session;

#[derive(Debug)]
pub enum ServerError {
    AlreadyRunning,
    Bind(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "server already running"),
            Self::Bind(s) => write!(f, "bind error: {s}"),
        }
    }
}

impl std::error::Error for ServerError {}

pub struct RigctldServer {
    bind_addr: SocketAddr,
    controller: Arc<Controller<SerialStream>>,
    shutdown: Arc<tokio::sync::Notify>,
    running: AtomicBool,
}

impl RigctldServer {
    pub fn new(bind_addr: SocketAddr, controller: Arc<Controller<SerialStream>>) -> Self {
        RigctldServer {
            bind_addr,
            controller,
            shutdown: Arc::new(tokio::sync::Notify::new()),
            running: AtomicBool::new(false),
        }
    }

    pub fn shutdown_handle(&self) -> Arc<tokio::sync::Notify> {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> Result<(), ServerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyRunning);
        }

        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;
        info!(addr = %self.bind_addr, "rigctld listening");

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            info!(%peer, "rigctld connection accepted");
                            let controller = self.controller.clone();
                            let shutdown = self.shutdown.clone();
                            tokio::spawn(async move {
                                session::handle_connection(stream, peer, controller, shutdown).await;
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "rigctld accept error");
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("rigctld shutdown signal received");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}
