use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::admin::AdminContext;
use crate::config::WebSocketConfig;
use crate::detail::Dismissal;
use crate::error::{AppError, Result};
use crate::models::MessageId;
use crate::websocket::messages::{WebSocketEvent, WebSocketMessage};

#[derive(Debug)]
pub struct WebSocketConnection {
    pub id: Uuid,
    pub session_id: Uuid,
    pub connected_at: DateTime<Utc>,
    pub sender: mpsc::UnboundedSender<WebSocketMessage>,
}

impl WebSocketConnection {
    pub fn new(session_id: Uuid, sender: mpsc::UnboundedSender<WebSocketMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            connected_at: Utc::now(),
            sender,
        }
    }

    pub fn send(&self, message: WebSocketMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| AppError::WebSocket("Failed to send message to connection".to_string()))?;
        Ok(())
    }
}

/// Live admin-panel connections, grouped by operator session.
#[derive(Debug, Clone)]
pub struct WebSocketManager {
    connections: Arc<RwLock<HashMap<Uuid, WebSocketConnection>>>,
    max_connections: usize,
    ping_interval: Duration,
}

impl WebSocketManager {
    pub fn new(config: &WebSocketConfig) -> Self {
        Self::with_limits(
            config.max_connections,
            Duration::from_secs(config.ping_interval_seconds),
        )
    }

    pub fn with_limits(max_connections: usize, ping_interval: Duration) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            max_connections,
            ping_interval,
        }
    }

    pub async fn add_connection(&self, connection: WebSocketConnection) -> Result<()> {
        let connection_id = connection.id;
        let mut connections = self.connections.write().await;
        if connections.len() >= self.max_connections {
            warn!(
                "Rejecting WebSocket connection: limit of {} reached",
                self.max_connections
            );
            return Err(AppError::WebSocket("Connection limit reached".to_string()));
        }
        connections.insert(connection_id, connection);
        info!("WebSocket connection added: {}", connection_id);
        Ok(())
    }

    pub async fn remove_connection(&self, connection_id: &Uuid) {
        let mut connections = self.connections.write().await;
        if connections.remove(connection_id).is_some() {
            info!("WebSocket connection removed: {}", connection_id);
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn session_connection_count(&self, session_id: Uuid) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|connection| connection.session_id == session_id)
            .count()
    }

    async fn send_to_connection(&self, connection_id: &Uuid, message: WebSocketMessage) {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(connection_id) {
            let _ = connection.send(message);
        }
    }

    pub async fn broadcast_to_session(&self, session_id: Uuid, event: WebSocketEvent) {
        let message = WebSocketMessage::from(event);
        let connections = self.connections.read().await;
        let mut failed_connections = Vec::new();

        for (connection_id, connection) in connections.iter() {
            if connection.session_id == session_id && connection.send(message.clone()).is_err() {
                warn!(
                    "Failed to send message to session {} connection: {}",
                    session_id, connection_id
                );
                failed_connections.push(*connection_id);
            }
        }

        drop(connections);
        if !failed_connections.is_empty() {
            let mut connections = self.connections.write().await;
            for connection_id in failed_connections {
                connections.remove(&connection_id);
                info!("Removed failed connection: {}", connection_id);
            }
        }
    }

    /// Runs one admin-panel socket until either side closes it or the
    /// session signs out.
    pub async fn handle_connection(&self, socket: WebSocket, context: AdminContext) -> Result<()> {
        let (mut sender, mut receiver) = socket.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<WebSocketMessage>();

        let connection = WebSocketConnection::new(context.session_id(), tx);
        let connection_id = connection.id;

        let _ = connection.send(WebSocketMessage::Connected { connection_id });
        let _ = connection.send(context.feed_message(Utc::now()));
        if let Some(html) = context.overlay_html(Utc::now()) {
            let _ = connection.send(WebSocketMessage::OverlayOpened { html });
        }

        self.add_connection(connection).await?;

        let ping_interval = self.ping_interval;
        let outgoing_task = tokio::spawn(async move {
            let mut ping = tokio::time::interval(ping_interval);
            ping.tick().await;

            loop {
                let message = tokio::select! {
                    message = rx.recv() => match message {
                        Some(message) => message,
                        None => break,
                    },
                    _ = ping.tick() => {
                        if sender.send(Message::Ping(Vec::new())).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize WebSocket message: {}", e);
                        continue;
                    }
                };

                if sender.send(Message::Text(json)).await.is_err() {
                    debug!("WebSocket connection closed, stopping outgoing message handler");
                    break;
                }

                if message == WebSocketMessage::SignedOut {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        });

        let manager_clone = self.clone();
        let incoming_task = tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        debug!("Received WebSocket message: {}", text);
                        match WebSocketMessage::from_json(&text) {
                            Ok(message) => {
                                manager_clone
                                    .dispatch(&context, connection_id, message)
                                    .await
                            }
                            Err(e) => {
                                manager_clone
                                    .send_to_connection(
                                        &connection_id,
                                        WebSocketMessage::Error {
                                            message: format!("Invalid message: {}", e),
                                        },
                                    )
                                    .await
                            }
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        debug!("Received binary WebSocket message (not supported)");
                    }
                    Ok(Message::Close(_)) => {
                        debug!("WebSocket connection closed by client");
                        break;
                    }
                    Err(e) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        });

        let outgoing_abort = outgoing_task.abort_handle();
        let incoming_abort = incoming_task.abort_handle();
        tokio::select! {
            _ = outgoing_task => {
                debug!("Outgoing message handler completed");
                incoming_abort.abort();
            }
            _ = incoming_task => {
                debug!("Incoming message handler completed");
                outgoing_abort.abort();
            }
        }

        self.remove_connection(&connection_id).await;
        Ok(())
    }

    async fn dispatch(&self, context: &AdminContext, connection_id: Uuid, message: WebSocketMessage) {
        match message {
            WebSocketMessage::View { id } => match MessageId::parse(&id) {
                Ok(id) => {
                    context.view(&id).await;
                }
                Err(e) => self.reject(connection_id, e.to_string()).await,
            },
            WebSocketMessage::MarkRead { id } => match MessageId::parse(&id) {
                Ok(id) => {
                    let _ = context.mark_read(&id).await;
                }
                Err(e) => self.reject(connection_id, e.to_string()).await,
            },
            WebSocketMessage::CloseOverlay => context.dismiss_overlay(Dismissal::CloseButton).await,
            WebSocketMessage::DismissOverlay => context.dismiss_overlay(Dismissal::Backdrop).await,
            WebSocketMessage::RetryFeed => {
                context.retry_feed();
            }
            WebSocketMessage::Ping => {
                self.send_to_connection(&connection_id, WebSocketMessage::Pong)
                    .await
            }
            _ => debug!("Received unhandled WebSocket message type"),
        }
    }

    async fn reject(&self, connection_id: Uuid, message: String) {
        self.send_to_connection(&connection_id, WebSocketMessage::Error { message })
            .await
    }
}
