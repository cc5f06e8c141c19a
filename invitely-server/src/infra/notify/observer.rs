use std::fmt;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type ObserverId = Uuid;

/// Lifecycle of one observer connection. Only `Connected` observers are in
/// the hub's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Connecting,
    Connected,
    Disconnected,
}

/// The observer's writer task has stopped, so its socket is gone.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("observer connection closed")]
pub struct DeliveryError;

/// Registry entry for a connected observer. Frames pushed here are written
/// to the socket by the connection's writer task.
pub struct Observer {
    pub id: ObserverId,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::UnboundedSender<Message>,
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .field("channel_closed", &self.sender.is_closed())
            .finish()
    }
}

impl Observer {
    pub fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::now_v7(),
            connected_at: Utc::now(),
            sender,
        }
    }

    /// Queue a frame without waiting.
    pub fn deliver(&self, frame: Message) -> Result<(), DeliveryError> {
        self.sender.send(frame).map_err(|_| DeliveryError)
    }
}
