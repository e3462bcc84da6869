use meshcall_core::{EndpointId, InboundMessage, RoomId};
use meshcall_server::{DelegationPolicy, InMemorySecretStore};
use std::sync::Arc;

use crate::integration::{create_test_engine, create_test_engine_with, init_tracing};
use crate::utils::{
    TEST_SECRET, accepted_token, join_room, query_members, send_inbound, test_room,
    wait_for_event,
};

async fn invite(
    engine_tx: &tokio::sync::mpsc::Sender<meshcall_server::EngineCommand>,
    delivery_rx: &mut tokio::sync::mpsc::UnboundedReceiver<meshcall_server::Delivery>,
    host: &EndpointId,
    guest: &EndpointId,
) -> String {
    join_room(engine_tx, host, TEST_SECRET).await.expect("Failed to join");
    send_inbound(
        engine_tx,
        host,
        InboundMessage::UserAccepted {
            room_id: Some(test_room()),
            socket_id: Some(guest.clone()),
        },
    )
    .await
    .expect("Failed to accept");
    let accepted = wait_for_event(delivery_rx, guest, "joinAccepted")
        .await
        .expect("Guest should be accepted");
    accepted_token(&accepted).expect("Token")
}

#[tokio::test]
async fn test_delegated_secret_bound_to_invitee() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let (host, guest, thief) = (
        EndpointId::from("host"),
        EndpointId::from("guest"),
        EndpointId::from("thief"),
    );
    let token = invite(&engine_tx, &mut delivery_rx, &host, &guest).await;

    join_room(&engine_tx, &thief, &token).await.expect("Failed to send");
    // A rejected attempt by another endpoint does not burn the invitation.
    join_room(&engine_tx, &guest, &token).await.expect("Failed to join");

    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert_eq!(members, vec![host, guest]);
}

#[tokio::test]
async fn test_unbound_policy_admits_any_bearer() {
    init_tracing();

    let store = Arc::new(InMemorySecretStore::from_pairs([("r1", TEST_SECRET)]));
    let policy = DelegationPolicy {
        bind_to_endpoint: false,
        ..DelegationPolicy::default()
    };
    let (engine_tx, mut delivery_rx) = create_test_engine_with(store, policy);
    let (host, guest, other) = (
        EndpointId::from("host"),
        EndpointId::from("guest"),
        EndpointId::from("other"),
    );
    let token = invite(&engine_tx, &mut delivery_rx, &host, &guest).await;

    join_room(&engine_tx, &other, &token).await.expect("Failed to join");

    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert_eq!(members, vec![host, other]);
}

#[tokio::test]
async fn test_delegated_secret_does_not_open_other_rooms() {
    init_tracing();

    let store = Arc::new(InMemorySecretStore::from_pairs([
        ("r1", TEST_SECRET),
        ("r2", "another"),
    ]));
    let (engine_tx, mut delivery_rx) = create_test_engine_with(store, DelegationPolicy::default());
    let (host, guest) = (EndpointId::from("host"), EndpointId::from("guest"));
    let token = invite(&engine_tx, &mut delivery_rx, &host, &guest).await;

    let r2 = RoomId::from("r2");
    send_inbound(
        &engine_tx,
        &guest,
        InboundMessage::RoomJoined {
            room_id: Some(r2.clone()),
            secret: Some(token),
        },
    )
    .await
    .expect("Failed to send");

    let members = query_members(&engine_tx, &r2)
        .await
        .expect("Members query failed");
    assert!(members.is_empty());
}
