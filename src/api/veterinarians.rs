use reqwest::Method;
use serde_json::Value;

use crate::cache::EntityTag;
use crate::models::{Veterinarian, VeterinarianSearch, VeterinarianUpdate};

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::Resource;

/// Veterinarian accounts. There is no create route; accounts come from registration.
pub struct Veterinarians;

impl Resource for Veterinarians {
  const PATH: &'static str = "/Veterinarians";
  const TAG: EntityTag = EntityTag::Veterinarians;
  const NAME: &'static str = "veterinarian";

  type Id = String;
  type Entity = Veterinarian;
  type Update = VeterinarianUpdate;
  type Search = VeterinarianSearch;
}

impl ApiClient {
  pub async fn activate_veterinarian(&self, id: &str) -> Result<(), ApiError> {
    self.veterinarian_action(id, "Activate").await
  }

  pub async fn deactivate_veterinarian(&self, id: &str) -> Result<(), ApiError> {
    self.veterinarian_action(id, "Deactivate").await
  }

  async fn veterinarian_action(&self, id: &str, action: &str) -> Result<(), ApiError> {
    let path = format!("{}/{}/{}", Veterinarians::PATH, id, action);
    let _: Value = self.send(Method::POST, &path, None).await?;
    Ok(())
  }
}
