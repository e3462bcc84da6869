use meshcall_core::{EndpointId, OutboundEvent};

use crate::integration::{create_test_engine, init_tracing};
use crate::utils::{TEST_SECRET, drain, join_room, query_members, test_room};

#[tokio::test]
async fn test_each_joiner_offers_to_everyone_before_it() {
    init_tracing();

    let (engine_tx, mut delivery_rx) = create_test_engine();
    let peers: Vec<EndpointId> = ["A", "B", "C", "D"]
        .into_iter()
        .map(EndpointId::from)
        .collect();

    for peer in &peers {
        join_room(&engine_tx, peer, TEST_SECRET).await.expect("Failed to join");
    }
    let members = query_members(&engine_tx, &test_room())
        .await
        .expect("Members query failed");
    assert_eq!(members, peers);

    let deliveries = drain(&mut delivery_rx);
    assert_eq!(deliveries.len(), peers.len() - 1);

    // One offer instruction per unordered pair: the newer peer initiates.
    for (i, delivery) in deliveries.iter().enumerate() {
        let joiner = &peers[i + 1];
        assert_eq!(&delivery.to, joiner);
        let OutboundEvent::CreateOffers { sockets, room_id } = &delivery.event else {
            panic!("Expected createOffers, got {}", delivery.event.event_name());
        };
        assert_eq!(room_id, &test_room());
        assert_eq!(sockets.as_slice(), &peers[..=i]);
    }
}
