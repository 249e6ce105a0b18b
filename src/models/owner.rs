use serde::{Deserialize, Serialize};

use super::SearchCriteria;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
  pub id: i64,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  /// National identity number (11 digits)
  #[serde(rename = "tcKimlikNo", default)]
  pub national_id: String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub phone_number: String,
  pub emergency_person: Option<String>,
  pub emergency_phone: Option<String>,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,
}

impl Owner {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCreate {
  pub first_name: String,
  pub last_name: String,
  #[serde(rename = "tcKimlikNo")]
  pub national_id: String,
  pub address: String,
  pub phone_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub emergency_person: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub emergency_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerUpdate {
  pub first_name: String,
  pub last_name: String,
  #[serde(rename = "tcKimlikNo")]
  pub national_id: String,
  pub address: String,
  pub phone_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub emergency_person: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub emergency_phone: Option<String>,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(rename = "tcKimlikNo", skip_serializing_if = "Option::is_none")]
  pub national_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone_number: Option<String>,
}

impl SearchCriteria for OwnerSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none()
      && self.first_name.is_none()
      && self.last_name.is_none()
      && self.national_id.is_none()
      && self.phone_number.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_owner_deserializes_wire_names() {
    let json = r#"{
      "id": 7,
      "firstName": "Ayşe",
      "lastName": "Yılmaz",
      "tcKimlikNo": "12345678901",
      "address": "Kadıköy, İstanbul",
      "phoneNumber": "05321234567",
      "version": 3
    }"#;
    let owner: Owner = serde_json::from_str(json).unwrap();
    assert_eq!(owner.national_id, "12345678901");
    assert_eq!(owner.emergency_person, None);
    assert_eq!(owner.version, 3);
  }

  #[test]
  fn test_empty_search_serializes_to_empty_object() {
    let search = OwnerSearch::default();
    assert!(search.is_empty());
    assert_eq!(serde_json::to_string(&search).unwrap(), "{}");
  }

  #[test]
  fn test_search_uses_wire_names() {
    let search = OwnerSearch {
      national_id: Some("123".to_string()),
      ..Default::default()
    };
    assert!(!search.is_empty());
    assert_eq!(
      serde_json::to_string(&search).unwrap(),
      r#"{"tcKimlikNo":"123"}"#
    );
  }
}
