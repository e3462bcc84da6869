use crate::registry::ConnectionRegistry;
use crate::relay::Delivery;
use meshcall_core::{EndpointId, OutboundEvent, RoomId};

#[derive(Debug, Default, PartialEq)]
pub struct Unwound {
    /// One `socketDisconnected` per remaining member of each affected room.
    pub deliveries: Vec<Delivery>,
    /// Rooms left with no members.
    pub emptied_rooms: Vec<RoomId>,
}

/// Removes a lost endpoint from all its rooms and notifies the members left
/// behind. An endpoint that was in no room yields nothing.
pub fn unwind_endpoint(registry: &mut ConnectionRegistry, endpoint: &EndpointId) -> Unwound {
    let mut unwound = Unwound::default();

    for departure in registry.remove_endpoint_everywhere(endpoint) {
        if departure.remaining.is_empty() {
            unwound.emptied_rooms.push(departure.room_id);
            continue;
        }
        unwound
            .deliveries
            .extend(departure.remaining.into_iter().map(|member| {
                Delivery::new(
                    member,
                    OutboundEvent::SocketDisconnected {
                        socket_id: endpoint.clone(),
                    },
                )
            }));
    }

    unwound
}
