use meshcall_core::{EndpointId, InboundMessage};

use crate::integration::{create_test_engine, init_tracing};
use crate::utils::{
    TEST_SECRET, disconnect, drain, join_room, query_members, send_inbound, test_room,
};

#[tokio::test]
async fn test_room_left_removes_membership_without_notification() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (a, b) = (EndpointId::from("A"), EndpointId::from("B"));
    join_room(&engine_tx, &a, TEST_SECRET).await.expect("Failed to join");
    join_room(&engine_tx, &b, TEST_SECRET).await.expect("Failed to join");
    query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    drain(&mut delivery_rx);

    send_inbound(
        &engine_tx,
        &a,
        InboundMessage::RoomLeft {
            room_id: Some(test_room()),
        },
    )
    .await
    .expect("Failed to leave");

    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert_eq!(members, vec![b]);
    assert!(drain(&mut delivery_rx).is_empty());

    // Already gone from the room, so the later socket loss notifies nobody.
    disconnect(&engine_tx, &a).await.expect("Failed to disconnect");
    query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert!(drain(&mut delivery_rx).is_empty());
}
