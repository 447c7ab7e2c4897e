pub mod handler;
pub mod manager;
pub mod messages;

#[cfg(test)]
mod tests;

pub use handler::websocket_handler;
pub use manager::{WebSocketConnection, WebSocketManager};
pub use messages::{WebSocketEvent, WebSocketMessage};
