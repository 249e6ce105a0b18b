use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
  pub user_name: String,
  pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
  pub user_id: String,
  pub user_name: String,
  pub token: String,
  #[serde(default)]
  pub expires_in: i64,
  #[serde(default)]
  pub role: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  pub user_name: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  /// Sent as an explicit `null` when not given
  pub license_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub user_name: String,
}

/// Signed-in user and bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
  pub user: User,
}

impl From<LoginResponse> for Session {
  fn from(resp: LoginResponse) -> Self {
    Session {
      token: resp.token,
      user: User {
        id: resp.user_id,
        user_name: resp.user_name,
      },
    }
  }
}
