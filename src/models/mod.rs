//! Wire types for the clinic API.
//!
//! Field names follow the backend's camelCase JSON. Each entity comes with
//! create/update/search DTOs; search DTOs omit absent fields so an empty
//! criteria object serializes to `{}`.

pub mod auth;
pub mod code;
pub mod owner;
pub mod pet;
pub mod vaccine;
pub mod veterinarian;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, Session, User};
pub use code::{Code, CodeCreate, CodeSearch, CodeType, CodeUpdate, SelectOption};
pub use owner::{Owner, OwnerCreate, OwnerSearch, OwnerUpdate};
pub use pet::{Gender, Pet, PetCreate, PetSearch, PetUpdate};
pub use vaccine::{
  DueStatus, Vaccine, VaccineCreate, VaccineRecord, VaccineRecordCreate, VaccineRecordSearch,
  VaccineRecordUpdate, VaccineSearch, VaccineStock, VaccineStockCreate, VaccineStockSearch,
  VaccineStockUpdate, VaccineUpdate,
};
pub use veterinarian::{Veterinarian, VeterinarianSearch, VeterinarianUpdate};

use serde::Serialize;
use std::fmt::Debug;

/// Search criteria sent to `POST /{base}/Search`.
pub trait SearchCriteria:
  Serialize + Clone + Default + Debug + PartialEq + Send + Sync + 'static
{
  /// True when no filter field is set. Empty criteria are never sent as a
  /// search; callers fall back to "get all".
  fn is_empty(&self) -> bool;
}

/// A person's name as embedded in other entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
}

impl PersonRef {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_string()
  }
}

/// Trimmed value, or `None` when blank.
pub fn non_empty(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

/// Parse an id typed into a filter field; blank, zero and garbage mean "unset".
pub fn parse_id(value: &str) -> Option<i64> {
  value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// The `YYYY-MM-DD` part of an ISO timestamp as returned by the API.
pub fn date_part(value: &str) -> &str {
  value.get(..10).unwrap_or(value)
}
