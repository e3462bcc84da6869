use crate::engine::EngineCommand;
use crate::signaling::SignalingService;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use meshcall_core::{EndpointId, OutboundEvent, decode_inbound};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let endpoint = EndpointId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, endpoint, service))
}

async fn handle_socket(socket: WebSocket, endpoint: EndpointId, service: SignalingService) {
    info!("New WebSocket connection: {}", endpoint);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let directory = service.directory();
    directory.add_peer(endpoint.clone(), tx);
    directory.send_signal(
        &endpoint,
        &OutboundEvent::Welcome {
            socket_id: endpoint.clone(),
            ice_servers: directory.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let engine_tx = service.engine_tx.clone();
        let endpoint = endpoint.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match decode_inbound(&text) {
                        Ok(message) => {
                            let cmd = EngineCommand::Inbound {
                                endpoint: endpoint.clone(),
                                message,
                            };
                            if let Err(e) = engine_tx.send(cmd).await {
                                error!("Relay engine died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid message from {}: {}", endpoint, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    let send_finished = tokio::select! {
        _ = (&mut send_task) => true,
        _ = (&mut recv_task) => false,
    };

    // The reader may be mid-send into the engine; it must be gone before the
    // disconnect is queued so no join lands after the unwind.
    if send_finished {
        recv_task.abort();
        let _ = recv_task.await;
    } else {
        send_task.abort();
        let _ = send_task.await;
    }

    directory.remove_peer(&endpoint);
    let _ = service
        .engine_tx
        .send(EngineCommand::Disconnect {
            endpoint: endpoint.clone(),
        })
        .await;
    info!(
        "WebSocket disconnected: {} ({} still connected)",
        endpoint,
        directory.peer_count()
    );
}
