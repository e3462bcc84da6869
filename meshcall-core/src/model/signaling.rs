use crate::model::endpoint::EndpointId;
use crate::model::room::RoomId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Empty strings and `null` both mean "no identifier".
fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(T::from))
}

/// One entry of an `offersCreated` batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferEntry {
    #[serde(default)]
    pub offer: Value,
    #[serde(default, deserialize_with = "non_empty")]
    pub to: Option<EndpointId>,
    #[serde(default)]
    pub sender_details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    #[serde(default, deserialize_with = "non_empty")]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub answer: Value,
    #[serde(default, deserialize_with = "non_empty")]
    pub receiver: Option<EndpointId>,
    #[serde(default)]
    pub sender_details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NegoOfferPayload {
    #[serde(default)]
    pub offer: Value,
    #[serde(default, deserialize_with = "non_empty")]
    pub to: Option<EndpointId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NegoAnswerPayload {
    #[serde(default)]
    pub answer: Value,
    #[serde(default, deserialize_with = "non_empty")]
    pub to: Option<EndpointId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IceCandidatePayload {
    #[serde(default)]
    pub candidate: Value,
    #[serde(default, deserialize_with = "non_empty")]
    pub to: Option<EndpointId>,
}

/// Every event a browser peer may send to the relay.
///
/// Room and recipient identifiers stay optional here: a missing one is not a
/// decoding error, the relay ignores the message instead.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    JoinRequest {
        room_id: Option<RoomId>,
        user: Value,
    },
    UserAccepted {
        room_id: Option<RoomId>,
        socket_id: Option<EndpointId>,
    },
    RoomJoined {
        room_id: Option<RoomId>,
        secret: Option<String>,
    },
    OffersCreated {
        room_id: Option<RoomId>,
        offers: Vec<OfferEntry>,
    },
    AnswerCreated(AnswerPayload),
    NegoOffer(NegoOfferPayload),
    NegoAnswerCreated(NegoAnswerPayload),
    IceCandidate(IceCandidatePayload),
    StreamStopped {
        to: Option<EndpointId>,
        media_type: Value,
    },
    ChatSend {
        to: Option<EndpointId>,
        message: Value,
    },
    RoomLeft {
        room_id: Option<RoomId>,
    },
}

impl InboundMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinRequest { .. } => "joinRequest",
            Self::UserAccepted { .. } => "userAccepted",
            Self::RoomJoined { .. } => "roomJoined",
            Self::OffersCreated { .. } => "offersCreated",
            Self::AnswerCreated(_) => "answerCreated",
            Self::NegoOffer(_) => "negoOffer",
            Self::NegoAnswerCreated(_) => "negoAnswerCreated",
            Self::IceCandidate(_) => "iceCandidate",
            Self::StreamStopped { .. } => "streamStopped",
            Self::ChatSend { .. } => "chatSend",
            Self::RoomLeft { .. } => "roomLeft",
        }
    }
}

/// Every event the relay sends to a browser peer.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Welcome {
        socket_id: EndpointId,
        ice_servers: Vec<IceServerConfig>,
    },
    UserRequestJoinRoom {
        user: Value,
        socket_id: EndpointId,
    },
    JoinAccepted {
        room_id: RoomId,
        token: String,
    },
    CreateOffers {
        sockets: Vec<EndpointId>,
        room_id: RoomId,
    },
    AcceptOffer {
        offer: Value,
        sender: EndpointId,
        sender_details: Option<Value>,
        room_id: RoomId,
    },
    SaveAnswer {
        answer: Value,
        sender: EndpointId,
        sender_details: Option<Value>,
    },
    NegoOfferAccept {
        offer: Value,
        sender: EndpointId,
    },
    NegoSaveAnswer {
        answer: Value,
        sender: EndpointId,
    },
    SaveIceCandidate {
        candidate: Value,
        sender: EndpointId,
    },
    ClearTracks {
        sender: EndpointId,
        media_type: Value,
    },
    ReceiveChat {
        message: Value,
        sender: EndpointId,
    },
    SocketDisconnected {
        socket_id: EndpointId,
    },
}

impl OutboundEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::UserRequestJoinRoom { .. } => "userRequestJoinRoom",
            Self::JoinAccepted { .. } => "joinAccepted",
            Self::CreateOffers { .. } => "createOffers",
            Self::AcceptOffer { .. } => "acceptOffer",
            Self::SaveAnswer { .. } => "saveAnswer",
            Self::NegoOfferAccept { .. } => "negoOfferAccept",
            Self::NegoSaveAnswer { .. } => "negoSaveAnswer",
            Self::SaveIceCandidate { .. } => "saveIceCandidate",
            Self::ClearTracks { .. } => "clearTracks",
            Self::ReceiveChat { .. } => "receiveChat",
            Self::SocketDisconnected { .. } => "socketDisconnected",
        }
    }

    /// Positional arguments exactly as listed on the wire.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Welcome {
                socket_id,
                ice_servers,
            } => vec![json!({ "socketId": socket_id, "iceServers": ice_servers })],
            Self::UserRequestJoinRoom { user, socket_id } => {
                vec![json!({ "user": user, "socketId": socket_id })]
            }
            Self::JoinAccepted { room_id, token } => {
                vec![json!({ "roomId": room_id, "token": token })]
            }
            Self::CreateOffers { sockets, room_id } => {
                vec![json!({ "sockets": sockets, "roomId": room_id })]
            }
            Self::AcceptOffer {
                offer,
                sender,
                sender_details,
                room_id,
            } => {
                let mut body = Map::new();
                body.insert("offer".into(), offer.clone());
                body.insert("sender".into(), json!(sender));
                if let Some(details) = sender_details {
                    body.insert("senderDetails".into(), details.clone());
                }
                body.insert("roomId".into(), json!(room_id));
                vec![Value::Object(body)]
            }
            Self::SaveAnswer {
                answer,
                sender,
                sender_details,
            } => {
                let mut body = Map::new();
                body.insert("answer".into(), answer.clone());
                body.insert("sender".into(), json!(sender));
                if let Some(details) = sender_details {
                    body.insert("senderDetails".into(), details.clone());
                }
                vec![Value::Object(body)]
            }
            Self::NegoOfferAccept { offer, sender } => {
                vec![json!({ "offer": offer, "sender": sender })]
            }
            Self::NegoSaveAnswer { answer, sender } => {
                vec![json!({ "answer": answer, "sender": sender })]
            }
            Self::SaveIceCandidate { candidate, sender } => {
                vec![json!({ "candidate": candidate, "sender": sender })]
            }
            Self::ClearTracks { sender, media_type } => vec![json!(sender), media_type.clone()],
            Self::ReceiveChat { message, sender } => {
                vec![json!({ "message": message, "sender": sender })]
            }
            Self::SocketDisconnected { socket_id } => vec![json!(socket_id)],
        }
    }
}
