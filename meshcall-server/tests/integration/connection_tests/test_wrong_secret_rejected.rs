use meshcall_core::{EndpointId, InboundMessage};

use crate::integration::{create_test_engine, init_tracing};
use crate::utils::{TEST_SECRET, drain, join_room, query_members, send_inbound, test_room};

#[tokio::test]
async fn test_wrong_secret_adds_no_membership() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (member, intruder) = (EndpointId::from("A"), EndpointId::from("X"));

    join_room(&engine_tx, &member, TEST_SECRET)
        .await
        .expect("Failed to join");
    join_room(&engine_tx, &intruder, "guess")
        .await
        .expect("Failed to send join");

    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert_eq!(members, vec![member]);
    assert!(
        drain(&mut delivery_rx).is_empty(),
        "Rejected join must not trigger createOffers"
    );
}

#[tokio::test]
async fn test_join_without_secret_is_rejected() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let endpoint = EndpointId::from("A");

    send_inbound(
        &engine_tx,
        &endpoint,
        InboundMessage::RoomJoined {
            room_id: Some(test_room()),
            secret: None,
        },
    )
    .await
    .expect("Failed to send join");

    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert!(members.is_empty());
    assert!(drain(&mut delivery_rx).is_empty());
}
