//! Firebase Realtime Database backend over its REST and streaming API.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::sse::{apply_patch, apply_put, SseParser, StreamEvent};
use super::{MessageStore, Snapshot, StoreError, Subscription};
use crate::config::StoreConfig;
use crate::models::{Message, MessageId, MessagePatch, NewMessage, StoredMessage};

#[derive(Clone)]
pub struct RtdbStore {
    client: Client,
    stream_client: Client,
    base_url: Url,
    collection: String,
    credential: Option<String>,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RtdbStore {
    pub fn new(database_url: &str, collection: &str, request_timeout: Duration) -> Result<Self, StoreError> {
        let base_url = Url::parse(database_url)
            .map_err(|e| StoreError::Malformed(format!("invalid database url: {}", e)))?;

        let client = Client::builder().timeout(request_timeout).build()?;
        let stream_client = Client::builder().connect_timeout(request_timeout).build()?;

        Ok(Self {
            client,
            stream_client,
            base_url,
            collection: collection.trim_matches('/').to_string(),
            credential: None,
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Malformed("store.database_url is not set".to_string()))?;
        Self::new(
            database_url,
            &config.collection,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn url(&self, id: Option<&MessageId>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Malformed("database url cannot be a base".to_string()))?;
            segments.pop_if_empty();
            match id {
                None => {
                    segments.push(&format!("{}.json", self.collection));
                }
                Some(id) => {
                    segments.push(&self.collection);
                    segments.push(&format!("{}.json", id));
                }
            }
        }
        if let Some(token) = &self.credential {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::PermissionDenied);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

/// Converts the local copy of the collection into a snapshot. Entries that
/// are not records are skipped.
pub fn tree_to_snapshot(tree: &Value) -> Snapshot {
    let Value::Object(records) = tree else {
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|(key, value)| {
            if !value.is_object() {
                debug!("Skipping non-record entry {}", key);
                return None;
            }
            let stored: StoredMessage = match serde_json::from_value(value.clone()) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!("Skipping malformed record {}: {}", key, e);
                    return None;
                }
            };
            Some(Message::from_stored(MessageId::from_store(key.clone()), stored))
        })
        .collect()
}

#[async_trait]
impl MessageStore for RtdbStore {
    fn backend_name(&self) -> &'static str {
        "rtdb"
    }

    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let url = self.url(None)?;
        let response = self
            .stream_client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = Self::check(response).await?;
        info!("Opened realtime stream on {}", self.collection);

        let mut stream = response.bytes_stream();

        Ok(Subscription::spawn(move |tx| async move {
            let mut parser = SseParser::new();
            let mut tree = Value::Null;

            while let Some(chunk) = stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(Err(e.into())).await;
                        return;
                    }
                };

                for event in parser.feed(&bytes) {
                    let outcome = match StreamEvent::parse(&event) {
                        Ok(StreamEvent::Put { path, data }) => {
                            apply_put(&mut tree, &path, data);
                            Ok(tree_to_snapshot(&tree))
                        }
                        Ok(StreamEvent::Patch { path, data }) => {
                            apply_patch(&mut tree, &path, data);
                            Ok(tree_to_snapshot(&tree))
                        }
                        Ok(StreamEvent::KeepAlive) => continue,
                        Ok(StreamEvent::Cancel) => Err(StoreError::PermissionDenied),
                        Ok(StreamEvent::AuthRevoked) => Err(StoreError::AuthRevoked),
                        Ok(StreamEvent::Other(name)) => {
                            debug!("Ignoring stream event {}", name);
                            continue;
                        }
                        Err(e) => Err(StoreError::Malformed(e.to_string())),
                    };

                    let terminal = outcome.is_err();
                    if tx.send(outcome).await.is_err() || terminal {
                        return;
                    }
                }
            }

            let _ = tx.send(Err(StoreError::Closed)).await;
        }))
    }

    async fn fetch_once(&self, id: &MessageId) -> Result<Option<Message>, StoreError> {
        let response = self.client.get(self.url(Some(id))?).send().await?;
        let value: Value = Self::check(response).await?.json().await?;
        if value.is_null() {
            return Ok(None);
        }
        let stored: StoredMessage = serde_json::from_value(value)?;
        Ok(Some(Message::from_stored(id.clone(), stored)))
    }

    async fn update(&self, id: &MessageId, patch: MessagePatch) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.url(Some(id))?)
            .json(&patch.to_json())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn push(&self, message: NewMessage) -> Result<MessageId, StoreError> {
        let response = self.client.post(self.url(None)?).json(&message).send().await?;
        let pushed: PushResponse = Self::check(response).await?.json().await?;
        MessageId::parse(&pushed.name).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    fn authorized(&self, id_token: &str) -> Arc<dyn MessageStore> {
        let mut store = self.clone();
        store.credential = Some(id_token.to_string());
        Arc::new(store)
    }
}
