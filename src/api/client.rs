use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};
use url::Url;

use super::envelope::normalize;
use super::error::ApiError;
use super::resource::{Creatable, Resource};

/// REST client for the clinic API.
///
/// Cloning is cheap; clones share the connection pool and the bearer token.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base: String,
  token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self, ApiError> {
    let base = Url::parse(base_url)?;
    Ok(Self {
      http: reqwest::Client::new(),
      base: base.as_str().trim_end_matches('/').to_string(),
      token: Arc::new(RwLock::new(None)),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base
  }

  pub fn set_token(&self, token: Option<String>) {
    *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
  }

  pub fn token(&self) -> Option<String> {
    self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
  }

  fn url(&self, path: &str) -> Result<Url, ApiError> {
    Ok(Url::parse(&format!("{}{}", self.base, path))?)
  }

  fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
    let builder = self.http.request(method, url);
    match self.token() {
      Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
      None => builder,
    }
  }

  /// Issue a request and decode the (normalized) response body.
  pub(crate) async fn send<T: DeserializeOwned>(
    &self,
    method: Method,
    path: &str,
    body: Option<Value>,
  ) -> Result<T, ApiError> {
    let url = self.url(path)?;
    debug!(%method, %url, "api request");

    let mut builder = self.request(method.clone(), url);
    if let Some(body) = body {
      builder = builder.json(&body);
    }
    let response = builder.send().await.inspect_err(|e| {
      warn!(%method, path, error = %e, "api request failed");
    })?;

    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
      warn!(%method, path, %status, "api error status");
      return Err(ApiError::from_status(status, &bytes));
    }

    normalize(&bytes).inspect_err(|e| {
      warn!(%method, path, error = %e, "api response rejected");
    })
  }

  /// Open a long-lived streaming `GET` (server-sent events).
  pub async fn open_stream(&self, path: &str) -> Result<Response, ApiError> {
    let url = self.url(path)?;
    debug!(%url, "opening event stream");
    let response = self
      .request(Method::GET, url)
      .header(ACCEPT, "text/event-stream")
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let bytes = response.bytes().await.unwrap_or_default();
      return Err(ApiError::from_status(status, &bytes));
    }
    Ok(response)
  }

  // ==========================================================================
  // Generic resource operations
  // ==========================================================================

  pub async fn get_all<R: Resource>(&self) -> Result<Vec<R::Entity>, ApiError> {
    self.send(Method::GET, R::PATH, None).await
  }

  pub async fn get_by_id<R: Resource>(&self, id: &R::Id) -> Result<R::Entity, ApiError> {
    self
      .send(Method::GET, &format!("{}/{}", R::PATH, id), None)
      .await
  }

  /// `POST {PATH}/Search`. Callers decide whether criteria are worth sending.
  pub async fn search<R: Resource>(
    &self,
    criteria: &R::Search,
  ) -> Result<Vec<R::Entity>, ApiError> {
    self
      .send(
        Method::POST,
        &format!("{}/Search", R::PATH),
        Some(to_body(criteria)?),
      )
      .await
  }

  /// Returns the created entity when the server echoes it back.
  pub async fn create<R: Creatable>(
    &self,
    payload: &R::Create,
  ) -> Result<Option<R::Entity>, ApiError> {
    self
      .send(Method::POST, R::PATH, Some(to_body(payload)?))
      .await
  }

  pub async fn update<R: Resource>(
    &self,
    id: &R::Id,
    payload: &R::Update,
  ) -> Result<Option<R::Entity>, ApiError> {
    self
      .send(
        Method::PUT,
        &format!("{}/{}", R::PATH, id),
        Some(to_body(payload)?),
      )
      .await
  }

  pub async fn delete<R: Resource>(&self, id: &R::Id) -> Result<(), ApiError> {
    let _: Value = self
      .send(Method::DELETE, &format!("{}/{}", R::PATH, id), None)
      .await?;
    Ok(())
  }
}

pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
  Ok(serde_json::to_value(payload)?)
}
