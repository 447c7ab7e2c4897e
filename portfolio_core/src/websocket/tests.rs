#[cfg(test)]
mod tests {
    use crate::feed::FeedStats;
    use crate::websocket::{
        manager::{WebSocketConnection, WebSocketManager},
        messages::{WebSocketEvent, WebSocketMessage},
    };
    use std::time::Duration;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn manager() -> WebSocketManager {
        WebSocketManager::with_limits(4, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_websocket_connection_creation() {
        let session_id = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = WebSocketConnection::new(session_id, tx);

        assert_eq!(connection.session_id, session_id);
        assert!(!connection.id.is_nil());
    }

    #[tokio::test]
    async fn test_websocket_connection_send() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = WebSocketConnection::new(Uuid::new_v4(), tx);

        assert!(connection.send(WebSocketMessage::Pong).is_ok());

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, WebSocketMessage::Pong));
    }

    #[tokio::test]
    async fn test_add_and_remove_connection() {
        let manager = manager();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = WebSocketConnection::new(Uuid::new_v4(), tx);
        let connection_id = connection.id;

        manager.add_connection(connection).await.unwrap();
        assert_eq!(manager.connection_count().await, 1);

        manager.remove_connection(&connection_id).await;
        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let manager = WebSocketManager::with_limits(1, Duration::from_secs(30));
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        manager
            .add_connection(WebSocketConnection::new(Uuid::new_v4(), tx1))
            .await
            .unwrap();
        assert!(manager
            .add_connection(WebSocketConnection::new(Uuid::new_v4(), tx2))
            .await
            .is_err());
        assert_eq!(manager.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_the_session() {
        let manager = manager();
        let session = Uuid::new_v4();
        let other = Uuid::new_v4();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();

        manager.add_connection(WebSocketConnection::new(session, tx1)).await.unwrap();
        manager.add_connection(WebSocketConnection::new(session, tx2)).await.unwrap();
        manager.add_connection(WebSocketConnection::new(other, tx3)).await.unwrap();
        assert_eq!(manager.session_connection_count(session).await, 2);

        manager
            .broadcast_to_session(session, WebSocketEvent::OverlayClosed)
            .await;

        assert_eq!(rx1.recv().await.unwrap(), WebSocketMessage::OverlayClosed);
        assert_eq!(rx2.recv().await.unwrap(), WebSocketMessage::OverlayClosed);
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_drops_closed_connections() {
        let manager = manager();
        let session = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        manager.add_connection(WebSocketConnection::new(session, tx)).await.unwrap();
        drop(rx);

        manager.broadcast_to_session(session, WebSocketEvent::SignedOut).await;
        assert_eq!(manager.connection_count().await, 0);
    }

    #[test]
    fn test_websocket_message_wire_format() {
        let message = WebSocketMessage::FeedFailed {
            message: "boom".to_string(),
        };
        let json: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "FeedFailed");
        assert_eq!(json["data"]["message"], "boom");

        let unit = WebSocketMessage::OverlayClosed.to_json().unwrap();
        assert_eq!(unit, r#"{"type":"OverlayClosed"}"#);
    }

    #[test]
    fn test_client_commands_parse() {
        let view = WebSocketMessage::from_json(r#"{"type":"View","data":{"id":"-abc"}}"#).unwrap();
        assert_eq!(
            view,
            WebSocketMessage::View {
                id: "-abc".to_string()
            }
        );

        let retry = WebSocketMessage::from_json(r#"{"type":"RetryFeed"}"#).unwrap();
        assert_eq!(retry, WebSocketMessage::RetryFeed);
    }

    #[test]
    fn test_feed_event_marks_empty_feeds() {
        let empty = WebSocketMessage::from(WebSocketEvent::FeedRendered {
            stats: FeedStats::default(),
            rows_html: String::new(),
            table_html: String::new(),
        });
        assert!(matches!(empty, WebSocketMessage::FeedRendered { empty: true, .. }));

        let stats = FeedStats {
            total: 2,
            unread: 1,
            read: 1,
        };
        let full = WebSocketMessage::from(WebSocketEvent::FeedRendered {
            stats,
            rows_html: "<tr></tr>".to_string(),
            table_html: "<table><tbody><tr></tr></tbody></table>".to_string(),
        });
        match full {
            WebSocketMessage::FeedRendered { stats: sent, empty, .. } => {
                assert_eq!(sent, stats);
                assert!(!empty);
            }
            other => panic!("Expected FeedRendered message, got {:?}", other),
        }
    }

    #[test]
    fn test_websocket_message_invalid_json() {
        assert!(WebSocketMessage::from_json("{ invalid json }").is_err());
    }
}
