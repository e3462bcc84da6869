use meshcall_core::{EndpointId, InboundMessage, RoomId};
use tokio::sync::oneshot;

/// Commands fed to the relay engine by the signaling transport.
#[derive(Debug)]
pub enum EngineCommand {
    /// A decoded message from a connected endpoint.
    Inbound {
        endpoint: EndpointId,
        message: InboundMessage,
    },

    /// The endpoint's socket closed.
    Disconnect { endpoint: EndpointId },

    /// Snapshot of a room's members, oldest first.
    Members {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<EndpointId>>,
    },
}
