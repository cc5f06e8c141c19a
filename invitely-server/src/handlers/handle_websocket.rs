use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::debug;

use crate::infra::{
    app_state::AppState,
    notify::{NotificationHub, ObserverState},
};

/// Handle WebSocket upgrade request
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    debug!(state = ?ObserverState::Connecting, "observer handshake");
    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| serve_observer(socket, hub))
}

/// Drive one observer connection from registration to cleanup.
///
/// Frames from the hub are written by a dedicated task. The read side only
/// exists to notice the peer going away; whatever it sends is dropped.
pub async fn serve_observer(socket: WebSocket, hub: Arc<NotificationHub>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = hub.channel();
    let observer_id = hub.register(tx);
    debug!(
        observer.id = %observer_id,
        state = ?ObserverState::Connected,
        "observer connected"
    );

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(err) = ws_sender.send(frame).await {
                debug!(error = %err, "observer write failed");
                return;
            }
        }
        // Queue closed: the hub dropped this observer.
        let _ = ws_sender.close().await;
    });

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(
                        observer.id = %observer_id,
                        error = %err,
                        "observer read failed"
                    );
                    break;
                }
            },
            _ = &mut writer => break,
        }
    }

    hub.deregister(observer_id);
    writer.abort();
    debug!(
        observer.id = %observer_id,
        state = ?ObserverState::Disconnected,
        "observer disconnected"
    );
}
