use crate::engine::EngineCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use meshcall_core::{EndpointId, IceServerConfig, OutboundEvent, encode_outbound};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct DirectoryInner {
    peers: DashMap<EndpointId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Outbound half of the WebSocket transport, shared by every connection
/// and by the relay engine. Holds no command sender, so the engine owning
/// one does not keep its own inbox open.
#[derive(Clone)]
pub struct PeerDirectory {
    inner: Arc<DirectoryInner>,
}

impl PeerDirectory {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                peers: DashMap::new(),
                ice_servers,
            }),
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_peer(&self, endpoint: EndpointId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(endpoint, tx);
    }

    pub fn remove_peer(&self, endpoint: &EndpointId) {
        self.inner.peers.remove(endpoint);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, endpoint: &EndpointId, event: &OutboundEvent) {
        let Some(peer) = self.inner.peers.get(endpoint) else {
            warn!(
                "Attempted to send {} to disconnected endpoint {}",
                event.event_name(),
                endpoint
            );
            return;
        };

        match encode_outbound(event) {
            Ok(json) => {
                if let Err(e) = peer.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", endpoint, e);
                }
            }
            Err(e) => error!("Failed to encode {}: {}", event.event_name(), e),
        }
    }
}

#[async_trait]
impl SignalingOutput for PeerDirectory {
    async fn deliver(&self, to: EndpointId, event: OutboundEvent) {
        self.send_signal(&to, &event);
    }
}

/// Router state: the peer directory plus the engine's command inbox.
#[derive(Clone)]
pub struct SignalingService {
    directory: PeerDirectory,
    pub(crate) engine_tx: mpsc::Sender<EngineCommand>,
}

impl SignalingService {
    pub fn new(engine_tx: mpsc::Sender<EngineCommand>, directory: PeerDirectory) -> Self {
        Self {
            directory,
            engine_tx,
        }
    }

    pub fn directory(&self) -> &PeerDirectory {
        &self.directory
    }
}
