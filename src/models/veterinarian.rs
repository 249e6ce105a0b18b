use serde::{Deserialize, Serialize};

use super::SearchCriteria;

/// Veterinarian user account. Accounts are created through registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Veterinarian {
  pub id: String,
  #[serde(default)]
  pub user_name: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  pub license_number: Option<String>,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,
  pub is_active: Option<bool>,
}

impl Veterinarian {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Accounts without an explicit flag are treated as active.
  pub fn active(&self) -> bool {
    self.is_active.unwrap_or(true)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianUpdate {
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub license_number: Option<String>,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub license_number: Option<String>,
}

impl SearchCriteria for VeterinarianSearch {
  fn is_empty(&self) -> bool {
    self.user_name.is_none()
      && self.first_name.is_none()
      && self.last_name.is_none()
      && self.license_number.is_none()
  }
}
