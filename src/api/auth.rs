use reqwest::Method;
use serde_json::Value;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

use super::client::{to_body, ApiClient};
use super::error::ApiError;

impl ApiClient {
  /// `POST /Account/Login`. Does not install the returned token.
  pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    self
      .send(Method::POST, "/Account/Login", Some(to_body(credentials)?))
      .await
  }

  pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
    let _: Value = self
      .send(Method::POST, "/Account/Register", Some(to_body(request)?))
      .await?;
    Ok(())
  }
}
