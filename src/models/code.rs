use serde::{Deserialize, Serialize};

use super::SearchCriteria;

/// Lookup row used for species, breeds and genders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
  pub id: i64,
  #[serde(default)]
  pub code_type: String,
  #[serde(default)]
  pub code_name: String,
  pub parent_id: Option<i64>,
  pub version: Option<i64>,
  pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
  Species,
  Breed,
  Gender,
}

impl CodeType {
  pub const ALL: [CodeType; 3] = [CodeType::Species, CodeType::Breed, CodeType::Gender];

  pub fn as_str(&self) -> &'static str {
    match self {
      CodeType::Species => "Species",
      CodeType::Breed => "Breed",
      CodeType::Gender => "Gender",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
  }
}

/// `{value, label}` pair served by the species options endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
  pub value: i64,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCreate {
  pub code_type: String,
  pub code_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUpdate {
  pub code_type: String,
  pub code_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<i64>,
}

impl CodeSearch {
  /// Criteria selecting the breeds of one species.
  pub fn breeds_of(species_id: i64) -> Self {
    Self {
      code_type: Some(CodeType::Breed.as_str().to_string()),
      parent_id: Some(species_id),
      ..Default::default()
    }
  }
}

impl SearchCriteria for CodeSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none()
      && self.code_type.is_none()
      && self.code_name.is_none()
      && self.parent_id.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_breeds_of_body() {
    let body = serde_json::to_value(CodeSearch::breeds_of(4)).unwrap();
    assert_eq!(body, serde_json::json!({"codeType": "Breed", "parentId": 4}));
  }

  #[test]
  fn test_code_type_parse_is_case_insensitive() {
    assert_eq!(CodeType::parse("breed"), Some(CodeType::Breed));
    assert_eq!(CodeType::parse(" Species "), Some(CodeType::Species));
    assert_eq!(CodeType::parse("Color"), None);
  }
}
