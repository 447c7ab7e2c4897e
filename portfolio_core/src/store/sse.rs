//! Server-sent event framing and the realtime database's streaming protocol.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` parser. Chunks may split lines and
/// multi-byte characters anywhere.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);

            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line.as_ref(), ""),
            };

            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        events
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);
        if event.is_none() && data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: data.join("\n"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Put { path: String, data: Value },
    Patch { path: String, data: Value },
    KeepAlive,
    Cancel,
    AuthRevoked,
    Other(String),
}

#[derive(Deserialize)]
struct PathData {
    path: String,
    data: Value,
}

impl StreamEvent {
    pub fn parse(event: &SseEvent) -> Result<Self, serde_json::Error> {
        Ok(match event.event.as_str() {
            "put" => {
                let PathData { path, data } = serde_json::from_str(&event.data)?;
                StreamEvent::Put { path, data }
            }
            "patch" => {
                let PathData { path, data } = serde_json::from_str(&event.data)?;
                StreamEvent::Patch { path, data }
            }
            "keep-alive" => StreamEvent::KeepAlive,
            "cancel" => StreamEvent::Cancel,
            "auth_revoked" => StreamEvent::AuthRevoked,
            other => StreamEvent::Other(other.to_string()),
        })
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Replaces the value at `path`. A `null` value deletes it.
pub fn apply_put(tree: &mut Value, path: &str, data: Value) {
    let parts = segments(path);
    let Some((last, parents)) = parts.split_last() else {
        *tree = data;
        return;
    };

    if data.is_null() {
        let mut node = &mut *tree;
        for part in parents {
            match node.get_mut(*part) {
                Some(child) => node = child,
                None => return,
            }
        }
        if let Value::Object(map) = node {
            map.remove(*last);
        }
        return;
    }

    let mut node = tree;
    for part in parents {
        node = child_object(node, part);
    }
    *child_object(node, last) = data;
}

/// Merges each child of `data` into the node at `path`.
pub fn apply_patch(tree: &mut Value, path: &str, data: Value) {
    let Value::Object(children) = data else {
        apply_put(tree, path, data);
        return;
    };
    let base = path.trim_end_matches('/');
    for (key, value) in children {
        apply_put(tree, &format!("{}/{}", base, key), value);
    }
}

fn child_object<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    &mut node[key]
}
