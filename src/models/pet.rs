use serde::{Deserialize, Serialize};

use super::{Code, PersonRef, SearchCriteria};

/// Pet gender as the API encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
  Female = 1,
  Male = 2,
}

impl Gender {
  pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

  pub fn from_code(code: i32) -> Option<Self> {
    match code {
      1 => Some(Gender::Female),
      2 => Some(Gender::Male),
      _ => None,
    }
  }

  pub fn code(self) -> i32 {
    self as i32
  }

  pub fn label(self) -> &'static str {
    match self {
      Gender::Female => "Female",
      Gender::Male => "Male",
    }
  }
}

/// Owner reference embedded in a pet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetOwner {
  pub id: Option<i64>,
  #[serde(flatten)]
  pub name: PersonRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub microchip_number: String,
  pub pet_passport_number: Option<String>,
  #[serde(default)]
  pub gender: i32,
  pub color: Option<String>,
  #[serde(default)]
  pub species_id: i64,
  #[serde(default)]
  pub breed_id: i64,
  #[serde(default)]
  pub owner_id: i64,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,

  pub species: Option<Code>,
  pub breed: Option<Code>,
  pub owner: Option<PetOwner>,
}

impl Pet {
  pub fn gender_label(&self) -> &'static str {
    Gender::from_code(self.gender)
      .map(Gender::label)
      .unwrap_or("-")
  }

  pub fn species_name(&self) -> &str {
    self.species.as_ref().map(|c| c.code_name.as_str()).unwrap_or("-")
  }

  pub fn breed_name(&self) -> &str {
    self.breed.as_ref().map(|c| c.code_name.as_str()).unwrap_or("-")
  }

  pub fn owner_name(&self) -> String {
    self
      .owner
      .as_ref()
      .map(|o| o.name.full_name())
      .unwrap_or_else(|| "-".to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetCreate {
  pub name: String,
  pub microchip_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pet_passport_number: Option<String>,
  pub gender: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  pub species_id: i64,
  pub breed_id: i64,
  pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetUpdate {
  pub name: String,
  pub microchip_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pet_passport_number: Option<String>,
  pub gender: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  pub species_id: i64,
  pub breed_id: i64,
  pub owner_id: i64,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub species_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub breed_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub microchip_number: Option<String>,
}

impl SearchCriteria for PetSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none()
      && self.name.is_none()
      && self.owner_id.is_none()
      && self.species_id.is_none()
      && self.breed_id.is_none()
      && self.microchip_number.is_none()
  }
}
