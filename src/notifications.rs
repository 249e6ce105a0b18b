//! Server push channel.
//!
//! One streaming `GET` is opened at startup and read as server-sent events:
//! `data:` lines accumulate until a blank line dispatches the message.
//! A JSON payload with a `message` field is shown as that field, anything
//! else verbatim. The stream is not reopened when it ends.

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::event::Event;

/// Incremental server-sent events decoder.
#[derive(Debug, Default)]
pub struct SseParser {
  buffer: Vec<u8>,
  data: Vec<String>,
}

impl SseParser {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feed a chunk, returning every message completed by it.
  pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
    self.buffer.extend_from_slice(chunk);
    let mut messages = Vec::new();

    while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
      let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
      let line = String::from_utf8_lossy(&raw);
      let line = line.trim_end_matches(['\n', '\r']);

      if line.is_empty() {
        if !self.data.is_empty() {
          let payload = self.data.join("\n");
          self.data.clear();
          messages.push(display_text(&payload));
        }
      } else if let Some(rest) = line.strip_prefix("data:") {
        self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
      }
      // comments (`:`) and other fields are ignored
    }

    messages
  }
}

fn display_text(payload: &str) -> String {
  match serde_json::from_str::<Value>(payload) {
    Ok(Value::Object(map)) => match map.get("message").and_then(Value::as_str) {
      Some(message) => message.to_string(),
      None => payload.to_string(),
    },
    Ok(Value::String(s)) => s,
    _ => payload.to_string(),
  }
}

/// Open the stream and forward each message as [`Event::Notification`].
pub fn spawn(client: ApiClient, path: String, tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
  tokio::spawn(async move {
    let response = match client.open_stream(&path).await {
      Ok(response) => response,
      Err(e) => {
        warn!(path = %path, error = %e, "notification stream unavailable");
        return;
      }
    };
    info!(path = %path, "notification stream connected");

    let mut parser = SseParser::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
      let chunk = match chunk {
        Ok(chunk) => chunk,
        Err(e) => {
          warn!(error = %e, "notification stream failed");
          return;
        }
      };
      for message in parser.push(&chunk) {
        debug!(text = %message, "notification received");
        if tx.send(Event::Notification(message)).is_err() {
          return;
        }
      }
    }
    warn!(path = %path, "notification stream closed");
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{FakeBackend, NOTIFICATIONS_PATH};

  #[test]
  fn test_message_spanning_chunks() {
    let mut parser = SseParser::new();
    assert!(parser.push("data: {\"message\":\"Düşük ".as_bytes()).is_empty());
    assert!(parser.push(b"stock\"}\n").is_empty());
    assert_eq!(parser.push(b"\n"), vec!["Düşük stock".to_string()]);
  }

  #[test]
  fn test_multiline_data_and_comments() {
    let mut parser = SseParser::new();
    let messages = parser.push(b": ping\n\ndata: line one\r\ndata: line two\r\n\r\n");
    assert_eq!(messages, vec!["line one\nline two".to_string()]);
  }

  #[test]
  fn test_plain_and_string_payloads() {
    let mut parser = SseParser::new();
    let messages = parser.push(b"data: Clinic closes at 18:00\n\ndata: \"quoted\"\n\n");
    assert_eq!(messages, vec!["Clinic closes at 18:00", "quoted"]);
  }

  #[tokio::test]
  async fn test_stream_forwards_messages() {
    let backend = FakeBackend::start().await;
    let client = ApiClient::new(&backend.base_url()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn(client, NOTIFICATIONS_PATH.to_string(), tx)
      .await
      .unwrap();

    let mut received = Vec::new();
    while let Ok(Event::Notification(message)) = rx.try_recv() {
      received.push(message);
    }
    assert_eq!(received, vec!["Low stock: Rabies", "Clinic closes at 18:00"]);
  }
}
