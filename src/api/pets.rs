use reqwest::Method;

use crate::cache::EntityTag;
use crate::models::{Pet, PetCreate, PetSearch, PetUpdate};

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::{Creatable, Resource};

pub struct Pets;

impl Resource for Pets {
  const PATH: &'static str = "/Pets";
  const TAG: EntityTag = EntityTag::Pets;
  const NAME: &'static str = "pet";

  type Id = i64;
  type Entity = Pet;
  type Update = PetUpdate;
  type Search = PetSearch;
}

impl Creatable for Pets {
  type Create = PetCreate;
}

impl ApiClient {
  /// `GET /Pets/OwnerId/{ownerId}`
  pub async fn pets_by_owner(&self, owner_id: i64) -> Result<Vec<Pet>, ApiError> {
    self
      .send(Method::GET, &format!("/Pets/OwnerId/{}", owner_id), None)
      .await
  }
}
