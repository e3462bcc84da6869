use crate::auth::{AuthFailure, MintError};
use meshcall_core::{EndpointId, OutboundEvent};
use thiserror::Error;

/// One outbound event addressed to one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub to: EndpointId,
    pub event: OutboundEvent,
}

impl Delivery {
    pub fn new(to: EndpointId, event: OutboundEvent) -> Self {
        Self { to, event }
    }
}

/// Why the relay dropped a message without effect. None of these reach the
/// sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgnoreReason {
    #[error("missing room identifier")]
    MissingRoom,

    #[error("missing recipient")]
    MissingTarget,

    #[error("room has no members")]
    RoomEmpty,

    #[error("endpoint is already a member")]
    AlreadyMember,

    #[error("endpoint is not a member")]
    NotMember,

    #[error("join not authorized: {0}")]
    Unauthorized(#[from] AuthFailure),

    #[error("could not mint delegated secret: {0}")]
    TokenUnavailable(#[from] MintError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Processed; the deliveries may be empty (e.g. a solo join or a leave).
    Handled(Vec<Delivery>),
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn deliveries(self) -> Vec<Delivery> {
        match self {
            Self::Handled(deliveries) => deliveries,
            Self::Ignored(_) => Vec::new(),
        }
    }

    pub fn ignored_reason(&self) -> Option<&IgnoreReason> {
        match self {
            Self::Ignored(reason) => Some(reason),
            Self::Handled(_) => None,
        }
    }
}

impl From<IgnoreReason> for Outcome {
    fn from(reason: IgnoreReason) -> Self {
        Self::Ignored(reason)
    }
}
