//! Response envelope normalization.
//!
//! The backend answers create/update with `{success, message, data}` and
//! everything else with the bare payload. Every response body passes
//! through [`normalize`] so callers only ever see the payload.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Decode a response body into `T`, unwrapping an envelope if present.
///
/// An empty body decodes as JSON `null`, so `()` and `Option<_>` targets
/// accept it.
pub fn normalize<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  let value = if body.iter().all(u8::is_ascii_whitespace) {
    Value::Null
  } else {
    serde_json::from_slice(body)?
  };
  let payload = unwrap_envelope(value)?;
  Ok(serde_json::from_value(payload)?)
}

/// An object carrying a boolean `success` is an envelope; anything else is the payload.
pub fn unwrap_envelope(value: Value) -> Result<Value, ApiError> {
  let Value::Object(mut map) = value else {
    return Ok(value);
  };
  let Some(success) = map.get("success").and_then(Value::as_bool) else {
    return Ok(Value::Object(map));
  };

  if !success {
    let message = map
      .get("message")
      .and_then(Value::as_str)
      .map(String::from);
    return Err(ApiError::Rejected { message });
  }
  Ok(map.remove("data").unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Owner;

  #[test]
  fn test_bare_array() {
    let owners: Vec<Owner> = normalize(
      br#"[{"id": 1, "firstName": "Ali", "lastName": "Kaya", "tcKimlikNo": "12345678901"}]"#,
    )
    .unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].national_id, "12345678901");
  }

  #[test]
  fn test_success_envelope_is_unwrapped() {
    let body = br#"{"success": true, "message": "Created", "data": {"id": 9, "firstName": "Ali"}}"#;
    let owner: Owner = normalize(body).unwrap();
    assert_eq!(owner.id, 9);
    assert_eq!(owner.first_name, "Ali");
  }

  #[test]
  fn test_failed_envelope_is_an_error() {
    let err = normalize::<Owner>(br#"{"success": false, "message": "Duplicate TC Kimlik No"}"#)
      .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(err.user_message(), "Duplicate TC Kimlik No");
  }

  #[test]
  fn test_envelope_without_data_is_none() {
    let owner: Option<Owner> = normalize(br#"{"success": true}"#).unwrap();
    assert!(owner.is_none());
  }

  #[test]
  fn test_empty_body_is_unit() {
    normalize::<()>(b"").unwrap();
    normalize::<()>(b"  \n").unwrap();
  }

  #[test]
  fn test_object_with_non_bool_success_is_bare() {
    let value: Value = normalize(br#"{"success": "yes", "id": 1}"#).unwrap();
    assert_eq!(value["id"], 1);
  }
}
