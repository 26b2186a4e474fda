//! Relay service lifecycle
//!
//! Wires the registry, the relay engine and the edit propagator together
//! around one transport, and owns the cancellation token used for shutdown.

use crate::config::RelaySettings;
use crate::edit::EditPropagator;
use crate::engine::RelayEngine;
use crate::registry::ForwardRegistry;
use crate::sender::{RetryPolicy, RetrySender};
use crate::transport::RelayTransport;
use crate::types::RouteTable;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fully wired relay: engine and propagator sharing one registry.
pub struct RelayService<T: RelayTransport + ?Sized> {
    registry: Arc<ForwardRegistry>,
    engine: Arc<RelayEngine<T>>,
    propagator: Arc<EditPropagator<T>>,
    cancel: CancellationToken,
}

impl<T: RelayTransport + ?Sized> RelayService<T> {
    /// Build a service from settings, a loaded route table and a transport.
    pub fn new(settings: &RelaySettings, routes: RouteTable, transport: Arc<T>) -> Self {
        let registry = Arc::new(ForwardRegistry::new());
        let cancel = CancellationToken::new();
        let sender = RetrySender::new(
            transport.clone(),
            RetryPolicy::from_settings(settings),
            settings.media_placeholder_caption.clone(),
            cancel.child_token(),
        );
        let engine = Arc::new(RelayEngine::new(
            Arc::new(routes),
            registry.clone(),
            sender,
        ));
        let propagator = Arc::new(EditPropagator::new(
            transport,
            registry.clone(),
            settings.media_placeholder_caption.clone(),
        ));

        Self {
            registry,
            engine,
            propagator,
            cancel,
        }
    }

    /// Reset state before event processing begins.
    pub async fn start(&self) {
        self.registry.clear().await;
        info!(
            "Forward started with {} route(s)",
            self.engine.routes().len()
        );
    }

    /// Stop in-flight retry loops and drop all relay records.
    pub async fn shutdown(&self) {
        info!("Shutting down gracefully...");
        self.cancel.cancel();
        self.registry.clear().await;
    }

    /// Handler for new messages
    #[must_use]
    pub fn engine(&self) -> Arc<RelayEngine<T>> {
        self.engine.clone()
    }

    /// Handler for edited messages
    #[must_use]
    pub fn propagator(&self) -> Arc<EditPropagator<T>> {
        self.propagator.clone()
    }

    /// Shared registry
    #[must_use]
    pub fn registry(&self) -> Arc<ForwardRegistry> {
        self.registry.clone()
    }

    /// Token cancelled on shutdown
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
