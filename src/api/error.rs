use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Non-2xx response. `message` is the server's message when the body had one.
  #[error("{status}: {}", message.as_deref().unwrap_or("request failed"))]
  Status {
    status: StatusCode,
    message: Option<String>,
  },

  /// Envelope with `success: false`.
  #[error("{}", message.as_deref().unwrap_or("request rejected"))]
  Rejected { message: Option<String> },

  #[error("network error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("invalid url: {0}")]
  Url(#[from] url::ParseError),
}

impl ApiError {
  /// The message the server attached to this failure, if any.
  pub fn server_message(&self) -> Option<&str> {
    match self {
      ApiError::Status { message, .. } | ApiError::Rejected { message } => message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty()),
      _ => None,
    }
  }

  /// Text shown to the user: the server message verbatim, else the error itself.
  pub fn user_message(&self) -> String {
    self
      .server_message()
      .map(String::from)
      .unwrap_or_else(|| self.to_string())
  }

  /// Server message verbatim, else `fallback`.
  pub fn message_or(&self, fallback: &str) -> String {
    self
      .server_message()
      .map(String::from)
      .unwrap_or_else(|| fallback.to_string())
  }

  /// Build a status error, pulling `message` (or `title`) out of a JSON body.
  pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
    let message = serde_json::from_slice::<serde_json::Value>(body)
      .ok()
      .and_then(|v| {
        ["message", "Message", "title"]
          .into_iter()
          .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(String::from))
      })
      .or_else(|| {
        let text = String::from_utf8_lossy(body).trim().to_string();
        (!text.is_empty() && !text.starts_with('{') && !text.starts_with('<')).then_some(text)
      });
    ApiError::Status { status, message }
  }
}
