use crate::relay::Delivery;
use meshcall_core::{EndpointId, OutboundEvent, RoomId};

/// Instruction for a new joiner to open one offer per existing member.
///
/// The newest joiner always initiates. `existing` is the member list before
/// the join, oldest first; nothing is planned for a solo member.
pub fn plan_offers(
    room_id: &RoomId,
    joiner: &EndpointId,
    existing: &[EndpointId],
) -> Option<Delivery> {
    let sockets: Vec<EndpointId> = existing
        .iter()
        .filter(|member| *member != joiner)
        .cloned()
        .collect();

    if sockets.is_empty() {
        return None;
    }

    Some(Delivery::new(
        joiner.clone(),
        OutboundEvent::CreateOffers {
            sockets,
            room_id: room_id.clone(),
        },
    ))
}
