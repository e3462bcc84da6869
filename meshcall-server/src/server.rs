use crate::auth::{SecretAuthenticator, SecretStore};
use crate::config::Config;
use crate::engine::RelayEngine;
use crate::registry::ConnectionRegistry;
use crate::relay::NegotiationRelay;
use crate::signaling::{PeerDirectory, SignalingService};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wires the relay engine to a fresh signaling service and spawns the
/// engine loop. The engine only holds the peer directory, so the loop ends
/// once every clone of the service is dropped.
pub fn spawn_relay(
    config: &Config,
    store: Arc<dyn SecretStore>,
) -> (SignalingService, JoinHandle<()>) {
    let (engine_tx, engine_rx) = mpsc::channel(config.command_channel_capacity);
    let directory = PeerDirectory::new(config.ice_servers.clone());

    let relay = NegotiationRelay::new(
        ConnectionRegistry::new(),
        SecretAuthenticator::new(store, config.delegation_policy()),
    );
    let engine = RelayEngine::new(relay, engine_rx, Arc::new(directory.clone()))
        .with_sweep_interval(config.sweep_interval());

    let handle = tokio::spawn(engine.run());
    (SignalingService::new(engine_tx, directory), handle)
}
