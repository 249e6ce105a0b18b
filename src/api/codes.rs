use reqwest::Method;

use crate::cache::EntityTag;
use crate::models::{Code, CodeCreate, CodeSearch, CodeUpdate, SelectOption};

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::{Creatable, Resource};

pub struct Codes;

impl Resource for Codes {
  const PATH: &'static str = "/Codes";
  const TAG: EntityTag = EntityTag::Codes;
  const NAME: &'static str = "code";

  type Id = i64;
  type Entity = Code;
  type Update = CodeUpdate;
  type Search = CodeSearch;
}

impl Creatable for Codes {
  type Create = CodeCreate;
}

impl ApiClient {
  /// Species as `{value, label}` pairs from the server-side lookup cache.
  pub async fn species_options(&self) -> Result<Vec<SelectOption>, ApiError> {
    self
      .send(Method::GET, "/Cache/Codes/Species/Options", None)
      .await
  }

  pub async fn breeds_by_species(&self, species_id: i64) -> Result<Vec<Code>, ApiError> {
    self.search::<Codes>(&CodeSearch::breeds_of(species_id)).await
  }
}
