use async_trait::async_trait;
use meshcall_core::{EndpointId, OutboundEvent};

/// Implemented by the transport (WebSocket server) so the relay engine can
/// reach connected endpoints.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Sends one event to one endpoint. Unknown or gone endpoints are a no-op.
    async fn deliver(&self, to: EndpointId, event: OutboundEvent);
}
