//! API client with transparent caching and mutation-driven invalidation.

use crate::cache::{CacheLayer, CacheResult, EntityTag, QueryKey};
use crate::models::{
  Code, LoginRequest, LoginResponse, Pet, RegisterRequest, SearchCriteria, SelectOption,
};
use tracing::debug;

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::{Creatable, Resource};
use super::{Codes, Pets, Veterinarians};

/// Reads are served through the cache; every successful write invalidates
/// the affected tag.
#[derive(Clone)]
pub struct CachedClient {
  inner: ApiClient,
  cache: CacheLayer,
}

impl CachedClient {
  pub fn new(inner: ApiClient, cache: CacheLayer) -> Self {
    Self { inner, cache }
  }

  pub fn api(&self) -> &ApiClient {
    &self.inner
  }

  pub fn set_token(&self, token: Option<String>) {
    self.inner.set_token(token);
  }

  pub fn generation(&self, tag: EntityTag) -> u64 {
    self.cache.generation(tag)
  }

  pub fn clear_cache(&self) {
    self.cache.clear();
  }

  /// Forget cached reads under `tag` so the next one goes to the server.
  pub fn refresh(&self, tag: EntityTag) {
    self.cache.refresh(tag);
  }

  /// List a collection. Missing or empty criteria mean "get all".
  pub async fn list<R: Resource>(
    &self,
    criteria: Option<&R::Search>,
  ) -> Result<Vec<R::Entity>, ApiError> {
    let result = match criteria.filter(|c| !c.is_empty()) {
      Some(criteria) => {
        self
          .cache
          .fetch(&QueryKey::search(R::TAG, criteria), || {
            self.inner.search::<R>(criteria)
          })
          .await?
      }
      None => {
        self
          .cache
          .fetch(&QueryKey::all(R::TAG), || self.inner.get_all::<R>())
          .await?
      }
    };
    Ok(served(R::NAME, result))
  }

  pub async fn get<R: Resource>(&self, id: &R::Id) -> Result<R::Entity, ApiError> {
    let result = self
      .cache
      .fetch(&QueryKey::one(R::TAG, id), || self.inner.get_by_id::<R>(id))
      .await?;
    Ok(served(R::NAME, result))
  }

  pub async fn create<R: Creatable>(
    &self,
    payload: &R::Create,
  ) -> Result<Option<R::Entity>, ApiError> {
    let created = self.inner.create::<R>(payload).await?;
    self.cache.invalidate(R::TAG);
    Ok(created)
  }

  pub async fn update<R: Resource>(
    &self,
    id: &R::Id,
    payload: &R::Update,
  ) -> Result<Option<R::Entity>, ApiError> {
    let updated = self.inner.update::<R>(id, payload).await?;
    self.cache.invalidate(R::TAG);
    Ok(updated)
  }

  pub async fn delete<R: Resource>(&self, id: &R::Id) -> Result<(), ApiError> {
    self.inner.delete::<R>(id).await?;
    self.cache.invalidate(R::TAG);
    Ok(())
  }

  // ==========================================================================
  // Lookups
  // ==========================================================================

  pub async fn species_options(&self) -> Result<Vec<SelectOption>, ApiError> {
    let result = self
      .cache
      .fetch(&QueryKey::all(EntityTag::SpeciesOptions), || {
        self.inner.species_options()
      })
      .await?;
    Ok(served("species options", result))
  }

  /// Breeds of a species. No request is made for a non-positive id.
  pub async fn breeds_for_species(&self, species_id: i64) -> Result<Vec<Code>, ApiError> {
    if species_id <= 0 {
      return Ok(Vec::new());
    }
    let result = self
      .cache
      .fetch(&QueryKey::param(EntityTag::Breeds, species_id), || {
        self.inner.breeds_by_species(species_id)
      })
      .await?;
    Ok(served("breeds", result))
  }

  pub async fn pets_of_owner(&self, owner_id: i64) -> Result<Vec<Pet>, ApiError> {
    let result = self
      .cache
      .fetch(
        &QueryKey::param(<Pets as Resource>::TAG, format!("owner:{}", owner_id)),
        || self.inner.pets_by_owner(owner_id),
      )
      .await?;
    Ok(served("pets of owner", result))
  }

  /// All codes of one type, e.g. every species for the code form's parent picker.
  pub async fn codes_of_type(&self, code_type: &str) -> Result<Vec<Code>, ApiError> {
    let criteria = crate::models::CodeSearch {
      code_type: Some(code_type.to_string()),
      ..Default::default()
    };
    self.list::<Codes>(Some(&criteria)).await
  }

  // ==========================================================================
  // Veterinarian account state
  // ==========================================================================

  pub async fn activate_veterinarian(&self, id: &str) -> Result<(), ApiError> {
    self.inner.activate_veterinarian(id).await?;
    self.cache.invalidate(Veterinarians::TAG);
    Ok(())
  }

  pub async fn deactivate_veterinarian(&self, id: &str) -> Result<(), ApiError> {
    self.inner.deactivate_veterinarian(id).await?;
    self.cache.invalidate(Veterinarians::TAG);
    Ok(())
  }

  // ==========================================================================
  // Auth (never cached)
  // ==========================================================================

  pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    self.inner.login(credentials).await
  }

  pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
    self.inner.register(request).await?;
    self.cache.invalidate(Veterinarians::TAG);
    Ok(())
  }
}

fn served<T>(what: &str, result: CacheResult<T>) -> T {
  debug!(what, source = ?result.source, "read served");
  result.data
}
