use crate::auth::{AuthFailure, SecretAuthenticator};
use crate::registry::ConnectionRegistry;
use crate::relay::{Delivery, IgnoreReason, Outcome, plan_offers, unwind_endpoint};
use meshcall_core::{
    AnswerPayload, EndpointId, IceCandidatePayload, InboundMessage, NegoAnswerPayload,
    NegoOfferPayload, OfferEntry, OutboundEvent, RoomId,
};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Routes inbound negotiation messages and owns the membership and
/// delegated-secret tables.
///
/// Payloads (offers, answers, candidates, chat) are forwarded verbatim and
/// never inspected.
pub struct NegotiationRelay {
    registry: ConnectionRegistry,
    authenticator: SecretAuthenticator,
}

impl NegotiationRelay {
    pub fn new(registry: ConnectionRegistry, authenticator: SecretAuthenticator) -> Self {
        Self {
            registry,
            authenticator,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn authenticator(&self) -> &SecretAuthenticator {
        &self.authenticator
    }

    pub async fn handle(
        &mut self,
        sender: &EndpointId,
        message: InboundMessage,
        now: Instant,
    ) -> Outcome {
        let event = message.event_name();
        let outcome = match message {
            InboundMessage::JoinRequest { room_id, user } => {
                self.join_request(sender, room_id, user)
            }
            InboundMessage::UserAccepted { room_id, socket_id } => {
                self.user_accepted(sender, room_id, socket_id, now)
            }
            InboundMessage::RoomJoined { room_id, secret } => {
                self.room_joined(sender, room_id, secret, now).await
            }
            InboundMessage::OffersCreated { room_id, offers } => {
                Self::offers_created(sender, room_id, offers)
            }
            InboundMessage::AnswerCreated(payload) => Self::answer_created(sender, payload),
            InboundMessage::NegoOffer(NegoOfferPayload { offer, to }) => {
                Self::forward(to, OutboundEvent::NegoOfferAccept {
                    offer,
                    sender: sender.clone(),
                })
            }
            InboundMessage::NegoAnswerCreated(NegoAnswerPayload { answer, to }) => {
                Self::forward(to, OutboundEvent::NegoSaveAnswer {
                    answer,
                    sender: sender.clone(),
                })
            }
            InboundMessage::IceCandidate(IceCandidatePayload { candidate, to }) => {
                Self::forward(to, OutboundEvent::SaveIceCandidate {
                    candidate,
                    sender: sender.clone(),
                })
            }
            InboundMessage::StreamStopped { to, media_type } => {
                Self::forward(to, OutboundEvent::ClearTracks {
                    sender: sender.clone(),
                    media_type,
                })
            }
            InboundMessage::ChatSend { to, message } => {
                Self::forward(to, OutboundEvent::ReceiveChat {
                    message,
                    sender: sender.clone(),
                })
            }
            InboundMessage::RoomLeft { room_id } => self.room_left(sender, room_id),
        };

        if let Some(reason) = outcome.ignored_reason() {
            debug!("Ignored {} from {}: {}", event, sender, reason);
        }
        outcome
    }

    /// Unwinds a lost endpoint; the caller delivers the notifications.
    pub fn disconnect(&mut self, endpoint: &EndpointId) -> Vec<Delivery> {
        let unwound = unwind_endpoint(&mut self.registry, endpoint);
        for room_id in &unwound.emptied_rooms {
            self.authenticator.forget_room(room_id);
        }
        unwound.deliveries
    }

    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        self.authenticator.sweep_expired(now)
    }

    fn join_request(
        &self,
        sender: &EndpointId,
        room_id: Option<RoomId>,
        user: Value,
    ) -> Outcome {
        let Some(room_id) = room_id else {
            return IgnoreReason::MissingRoom.into();
        };
        let members = self.registry.members_of(&room_id);
        if members.is_empty() {
            return IgnoreReason::RoomEmpty.into();
        }

        info!("{} asks to join room '{}'", sender, room_id);
        let deliveries = members
            .into_iter()
            .filter(|member| member != sender)
            .map(|member| {
                Delivery::new(
                    member,
                    OutboundEvent::UserRequestJoinRoom {
                        user: user.clone(),
                        socket_id: sender.clone(),
                    },
                )
            })
            .collect();
        Outcome::Handled(deliveries)
    }

    fn user_accepted(
        &mut self,
        sender: &EndpointId,
        room_id: Option<RoomId>,
        target: Option<EndpointId>,
        now: Instant,
    ) -> Outcome {
        let Some(room_id) = room_id else {
            return IgnoreReason::MissingRoom.into();
        };
        let Some(target) = target else {
            return IgnoreReason::MissingTarget.into();
        };
        if !self.registry.contains(&room_id, sender) {
            return IgnoreReason::NotMember.into();
        }

        let token = match self
            .authenticator
            .mint_delegated_secret(&room_id, &target, now)
        {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to mint delegated secret for {}: {}", target, e);
                return IgnoreReason::from(e).into();
            }
        };

        info!("{} admitted {} to room '{}'", sender, target, room_id);
        Outcome::Handled(vec![Delivery::new(
            target,
            OutboundEvent::JoinAccepted { room_id, token },
        )])
    }

    async fn room_joined(
        &mut self,
        sender: &EndpointId,
        room_id: Option<RoomId>,
        secret: Option<String>,
        now: Instant,
    ) -> Outcome {
        let Some(room_id) = room_id else {
            return IgnoreReason::MissingRoom.into();
        };
        if self.registry.contains(&room_id, sender) {
            return IgnoreReason::AlreadyMember.into();
        }
        let Some(secret) = secret else {
            return IgnoreReason::Unauthorized(AuthFailure::NoMatchingSecret).into();
        };

        let grant = match self
            .authenticator
            .authorize(&room_id, sender, &secret, now)
            .await
        {
            Ok(grant) => grant,
            Err(failure) => {
                warn!("Rejected join of {} to room '{}': {}", sender, room_id, failure);
                return IgnoreReason::Unauthorized(failure).into();
            }
        };

        let existing = self.registry.members_of(&room_id);
        self.registry.add_member(&room_id, sender);
        info!(
            "{} joined room '{}' ({:?}), asking for {} offers",
            sender,
            room_id,
            grant,
            existing.len()
        );

        Outcome::Handled(plan_offers(&room_id, sender, &existing).into_iter().collect())
    }

    fn offers_created(
        sender: &EndpointId,
        room_id: Option<RoomId>,
        offers: Vec<OfferEntry>,
    ) -> Outcome {
        let Some(room_id) = room_id else {
            return IgnoreReason::MissingRoom.into();
        };

        debug!("{} created {} offers for room '{}'", sender, offers.len(), room_id);
        let deliveries = offers
            .into_iter()
            .filter_map(|entry| {
                let to = entry.to?;
                Some(Delivery::new(
                    to,
                    OutboundEvent::AcceptOffer {
                        offer: entry.offer,
                        sender: sender.clone(),
                        sender_details: entry.sender_details,
                        room_id: room_id.clone(),
                    },
                ))
            })
            .collect();
        Outcome::Handled(deliveries)
    }

    fn answer_created(sender: &EndpointId, payload: AnswerPayload) -> Outcome {
        let AnswerPayload {
            room_id,
            answer,
            receiver,
            sender_details,
        } = payload;

        if room_id.is_none() {
            return IgnoreReason::MissingRoom.into();
        }

        Self::forward(receiver, OutboundEvent::SaveAnswer {
            answer,
            sender: sender.clone(),
            sender_details,
        })
    }

    fn room_left(&mut self, sender: &EndpointId, room_id: Option<RoomId>) -> Outcome {
        let Some(room_id) = room_id else {
            return IgnoreReason::MissingRoom.into();
        };
        if !self.registry.remove_member(&room_id, sender) {
            return IgnoreReason::NotMember.into();
        }

        info!("{} left room '{}'", sender, room_id);
        if self.registry.members_of(&room_id).is_empty() {
            self.authenticator.forget_room(&room_id);
        }
        Outcome::Handled(Vec::new())
    }

    fn forward(to: Option<EndpointId>, event: OutboundEvent) -> Outcome {
        match to {
            Some(to) => Outcome::Handled(vec![Delivery::new(to, event)]),
            None => IgnoreReason::MissingTarget.into(),
        }
    }
}
