pub mod handle_websocket;
pub mod health;
pub mod invitees;
pub mod settings;
pub mod stats;
