use meshcall_core::{EndpointId, InboundMessage, OutboundEvent};
use serde_json::json;

use crate::integration::{create_test_engine, init_tracing};
use crate::utils::{TEST_SECRET, drain, join_room, query_members, send_inbound, test_room};

#[tokio::test]
async fn test_join_request_reaches_every_member() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (a, b, newcomer) = (
        EndpointId::from("A"),
        EndpointId::from("B"),
        EndpointId::from("N"),
    );
    join_room(&engine_tx, &a, TEST_SECRET).await.expect("Failed to join");
    join_room(&engine_tx, &b, TEST_SECRET).await.expect("Failed to join");
    query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    drain(&mut delivery_rx);

    let user = json!({ "name": "nina", "avatar": 3 });
    send_inbound(
        &engine_tx,
        &newcomer,
        InboundMessage::JoinRequest {
            room_id: Some(test_room()),
            user: user.clone(),
        },
    )
    .await
    .expect("Failed to send joinRequest");
    query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");

    let deliveries = drain(&mut delivery_rx);
    let recipients: Vec<&EndpointId> = deliveries.iter().map(|d| &d.to).collect();
    assert_eq!(recipients, vec![&a, &b]);
    for delivery in &deliveries {
        assert_eq!(
            delivery.event,
            OutboundEvent::UserRequestJoinRoom {
                user: user.clone(),
                socket_id: newcomer.clone(),
            }
        );
    }
}

#[tokio::test]
async fn test_join_request_to_unknown_room_is_dropped() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();

    send_inbound(
        &engine_tx,
        &EndpointId::from("N"),
        InboundMessage::JoinRequest {
            room_id: Some(test_room()),
            user: json!({}),
        },
    )
    .await
    .expect("Failed to send joinRequest");
    query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");

    assert!(drain(&mut delivery_rx).is_empty());
}
