use serde_json::json;

use crate::integration::{init_tracing, spawn_server};
use crate::utils::{TEST_ROOM, TEST_SECRET, TestClient};

#[tokio::test]
async fn test_closing_socket_notifies_room_members() {
    init_tracing();

    let addr = spawn_server().await.expect("Failed to start server");
    let mut a = TestClient::connect(addr).await.expect("A failed to connect");
    let mut b = TestClient::connect(addr).await.expect("B failed to connect");

    a.emit("roomJoined", vec![json!(TEST_ROOM), json!(TEST_SECRET)])
        .await
        .expect("A join");
    a.sync().await.expect("A sync");
    b.emit("roomJoined", vec![json!(TEST_ROOM), json!(TEST_SECRET)])
        .await
        .expect("B join");
    b.wait_for("createOffers").await.expect("createOffers");

    let a_id = a.socket_id.clone();
    a.close().await.expect("Failed to close");

    let args = b
        .wait_for("socketDisconnected")
        .await
        .expect("socketDisconnected");
    assert_eq!(args, vec![json!(a_id.as_str())]);

    b.close().await.expect("Failed to close");
}
