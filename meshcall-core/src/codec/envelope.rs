use crate::codec::error::CodecError;
use crate::model::{InboundMessage, OutboundEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON text frame: `{"event": "<name>", "args": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

const INBOUND_EVENTS: [&str; 11] = [
    "joinRequest",
    "userAccepted",
    "roomJoined",
    "offersCreated",
    "answerCreated",
    "negoOffer",
    "negoAnswerCreated",
    "iceCandidate",
    "streamStopped",
    "chatSend",
    "roomLeft",
];

struct Args {
    event: &'static str,
    values: Vec<Value>,
}

impl Args {
    fn take(&mut self, index: usize) -> Value {
        self.values
            .get_mut(index)
            .map(Value::take)
            .unwrap_or(Value::Null)
    }

    fn invalid(&self, index: usize, reason: impl Into<String>) -> CodecError {
        CodecError::InvalidArgument {
            event: self.event,
            index,
            reason: reason.into(),
        }
    }

    /// A string identifier; `null`, missing and `""` all decode to `None`.
    fn identifier<T: From<String>>(&mut self, index: usize) -> Result<Option<T>, CodecError> {
        match self.take(index) {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(T::from(s))),
            _ => Err(self.invalid(index, "expected a string")),
        }
    }

    fn object<T: DeserializeOwned>(&mut self, index: usize) -> Result<T, CodecError> {
        let value = self.take(index);
        if !value.is_object() {
            return Err(self.invalid(index, "expected an object"));
        }
        serde_json::from_value(value).map_err(|e| self.invalid(index, e.to_string()))
    }

    fn list<T: DeserializeOwned>(&mut self, index: usize) -> Result<Vec<T>, CodecError> {
        match self.take(index) {
            Value::Null => Ok(Vec::new()),
            value @ Value::Array(_) => {
                serde_json::from_value(value).map_err(|e| self.invalid(index, e.to_string()))
            }
            _ => Err(self.invalid(index, "expected an array")),
        }
    }
}

/// Decode one text frame into a known inbound message.
pub fn decode_inbound(text: &str) -> Result<InboundMessage, CodecError> {
    let envelope: Envelope = serde_json::from_str(text)?;

    let event = INBOUND_EVENTS
        .iter()
        .copied()
        .find(|name| *name == envelope.event)
        .ok_or(CodecError::UnknownEvent(envelope.event))?;

    let mut args = Args {
        event,
        values: envelope.args,
    };

    let message = match event {
        "joinRequest" => InboundMessage::JoinRequest {
            room_id: args.identifier(0)?,
            user: args.take(1),
        },
        "userAccepted" => InboundMessage::UserAccepted {
            room_id: args.identifier(0)?,
            socket_id: args.identifier(1)?,
        },
        "roomJoined" => InboundMessage::RoomJoined {
            room_id: args.identifier(0)?,
            secret: args.identifier(1)?,
        },
        "offersCreated" => InboundMessage::OffersCreated {
            room_id: args.identifier(0)?,
            offers: args.list(1)?,
        },
        "answerCreated" => InboundMessage::AnswerCreated(args.object(0)?),
        "negoOffer" => InboundMessage::NegoOffer(args.object(0)?),
        "negoAnswerCreated" => InboundMessage::NegoAnswerCreated(args.object(0)?),
        "iceCandidate" => InboundMessage::IceCandidate(args.object(0)?),
        "streamStopped" => InboundMessage::StreamStopped {
            to: args.identifier(0)?,
            media_type: args.take(1),
        },
        "chatSend" => InboundMessage::ChatSend {
            to: args.identifier(0)?,
            message: args.take(1),
        },
        _ => InboundMessage::RoomLeft {
            room_id: args.identifier(0)?,
        },
    };

    Ok(message)
}

/// Encode an outbound event into one text frame.
pub fn encode_outbound(event: &OutboundEvent) -> Result<String, CodecError> {
    let envelope = Envelope {
        event: event.event_name().to_string(),
        args: event.args(),
    };
    Ok(serde_json::to_string(&envelope)?)
}
