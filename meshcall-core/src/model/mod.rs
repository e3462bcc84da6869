mod endpoint;
mod room;
mod signaling;

pub use endpoint::EndpointId;
pub use room::RoomId;
pub use signaling::{
    AnswerPayload, IceCandidatePayload, IceServerConfig, InboundMessage, NegoAnswerPayload,
    NegoOfferPayload, OfferEntry, OutboundEvent,
};
