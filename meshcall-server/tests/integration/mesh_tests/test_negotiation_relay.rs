use meshcall_core::{
    AnswerPayload, EndpointId, IceCandidatePayload, InboundMessage, NegoAnswerPayload,
    NegoOfferPayload, OfferEntry, OutboundEvent,
};
use serde_json::json;

use crate::integration::{create_test_engine, init_tracing};
use crate::utils::{send_inbound, wait_for_event};

#[tokio::test]
async fn test_offer_batch_is_split_per_recipient() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (sender, a, b) = (
        EndpointId::from("S"),
        EndpointId::from("A"),
        EndpointId::from("B"),
    );

    send_inbound(
        &engine_tx,
        &sender,
        InboundMessage::OffersCreated {
            room_id: Some(crate::utils::test_room()),
            offers: vec![
                OfferEntry {
                    offer: json!("x"),
                    to: Some(a.clone()),
                    sender_details: None,
                },
                OfferEntry {
                    offer: json!("y"),
                    to: Some(b.clone()),
                    sender_details: None,
                },
            ],
        },
    )
    .await
    .expect("Failed to send offers");

    let to_a = wait_for_event(&mut delivery_rx, &a, "acceptOffer")
        .await
        .expect("A should get an offer");
    let to_b = wait_for_event(&mut delivery_rx, &b, "acceptOffer")
        .await
        .expect("B should get an offer");

    assert!(matches!(
        to_a,
        OutboundEvent::AcceptOffer { ref offer, ref sender, .. } if offer == &json!("x") && sender == &EndpointId::from("S")
    ));
    assert!(matches!(
        to_b,
        OutboundEvent::AcceptOffer { ref offer, .. } if offer == &json!("y")
    ));
}

#[tokio::test]
async fn test_point_to_point_events_reach_only_the_target() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (s, b) = (EndpointId::from("S"), EndpointId::from("B"));

    let messages = vec![
        InboundMessage::AnswerCreated(AnswerPayload {
            room_id: Some(crate::utils::test_room()),
            answer: json!({ "type": "answer", "sdp": "v=0" }),
            receiver: Some(b.clone()),
            sender_details: Some(json!({ "name": "sam" })),
        }),
        InboundMessage::NegoOffer(NegoOfferPayload {
            offer: json!("renegotiate"),
            to: Some(b.clone()),
        }),
        InboundMessage::NegoAnswerCreated(NegoAnswerPayload {
            answer: json!("ok"),
            to: Some(b.clone()),
        }),
        InboundMessage::IceCandidate(IceCandidatePayload {
            candidate: json!({ "candidate": "candidate:1 1 udp 1 10.0.0.1 9 typ host" }),
            to: Some(b.clone()),
        }),
        InboundMessage::StreamStopped {
            to: Some(b.clone()),
            media_type: json!("video"),
        },
        InboundMessage::ChatSend {
            to: Some(b.clone()),
            message: json!("hello"),
        },
    ];

    for message in messages {
        send_inbound(&engine_tx, &s, message)
            .await
            .expect("Failed to send");
    }

    let answer = wait_for_event(&mut delivery_rx, &b, "saveAnswer")
        .await
        .expect("saveAnswer");
    assert_eq!(
        answer,
        OutboundEvent::SaveAnswer {
            answer: json!({ "type": "answer", "sdp": "v=0" }),
            sender: s.clone(),
            sender_details: Some(json!({ "name": "sam" })),
        }
    );

    for expected in [
        "negoOfferAccept",
        "negoSaveAnswer",
        "saveIceCandidate",
        "clearTracks",
        "receiveChat",
    ] {
        wait_for_event(&mut delivery_rx, &b, expected)
            .await
            .unwrap_or_else(|e| panic!("{expected}: {e}"));
    }

    assert!(delivery_rx.try_recv().is_err(), "Nothing else is relayed");
}
