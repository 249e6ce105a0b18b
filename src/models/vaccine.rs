use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{date_part, PersonRef, SearchCriteria};

/// Follow-up window for records whose next dose is coming up.
pub const DUE_SOON_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub manufacturer: String,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineCreate {
  pub name: String,
  pub manufacturer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineUpdate {
  pub name: String,
  pub manufacturer: String,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manufacturer: Option<String>,
}

impl SearchCriteria for VaccineSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none() && self.name.is_none() && self.manufacturer.is_none()
  }
}

// ============================================================================
// Stocks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineStock {
  pub id: i64,
  #[serde(default)]
  pub vaccine_id: i64,
  #[serde(default)]
  pub stock_date: String,
  #[serde(default)]
  pub serial_id: String,
  #[serde(default)]
  pub quantity: i64,
  #[serde(default)]
  pub unit_price: f64,
  #[serde(default)]
  pub expiration_date: String,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,

  pub vaccine: Option<Vaccine>,
}

impl VaccineStock {
  pub fn vaccine_name(&self) -> &str {
    self.vaccine.as_ref().map(|v| v.name.as_str()).unwrap_or("-")
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineStockCreate {
  pub vaccine_id: i64,
  pub stock_date: String,
  pub serial_id: String,
  pub quantity: i64,
  pub unit_price: f64,
  pub expiration_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineStockUpdate {
  pub vaccine_id: i64,
  pub stock_date: String,
  pub serial_id: String,
  pub quantity: i64,
  pub unit_price: f64,
  pub expiration_date: String,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineStockSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub vaccine_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub serial_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stock_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expiration_date: Option<String>,
}

impl SearchCriteria for VaccineStockSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none()
      && self.vaccine_id.is_none()
      && self.serial_id.is_none()
      && self.stock_date.is_none()
      && self.expiration_date.is_none()
  }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPet {
  pub id: Option<i64>,
  #[serde(default)]
  pub name: String,
  pub owner: Option<PersonRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordVeterinarian {
  pub id: Option<String>,
  #[serde(flatten)]
  pub name: PersonRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineRecord {
  pub id: i64,
  #[serde(default)]
  pub pet_id: i64,
  #[serde(default)]
  pub vaccine_id: i64,
  #[serde(default)]
  pub veterinarian_id: String,
  #[serde(default)]
  pub vaccine_stock_id: i64,
  #[serde(default)]
  pub vaccination_date: String,
  pub next_due_date: Option<String>,
  pub created_at: Option<String>,
  #[serde(default)]
  pub version: i64,

  pub pet: Option<RecordPet>,
  pub vaccine: Option<Vaccine>,
  pub veterinarian: Option<RecordVeterinarian>,
  pub vaccine_stock: Option<VaccineStock>,
}

impl VaccineRecord {
  pub fn pet_name(&self) -> &str {
    self.pet.as_ref().map(|p| p.name.as_str()).unwrap_or("-")
  }

  pub fn owner_name(&self) -> String {
    self
      .pet
      .as_ref()
      .and_then(|p| p.owner.as_ref())
      .map(PersonRef::full_name)
      .unwrap_or_else(|| "-".to_string())
  }

  pub fn vaccine_name(&self) -> &str {
    self.vaccine.as_ref().map(|v| v.name.as_str()).unwrap_or("-")
  }

  pub fn veterinarian_name(&self) -> String {
    self
      .veterinarian
      .as_ref()
      .map(|v| v.name.full_name())
      .unwrap_or_else(|| "-".to_string())
  }

  pub fn due_status(&self, today: NaiveDate) -> DueStatus {
    DueStatus::classify(self.next_due_date.as_deref(), today)
  }
}

/// Follow-up state of a vaccine record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
  Overdue,
  DueSoon,
  UpToDate,
  NoFollowUp,
}

impl DueStatus {
  /// Classify a `nextDueDate` against `today`.
  ///
  /// A due date already behind us is overdue, one within the next
  /// [`DUE_SOON_DAYS`] days (today included) is due soon. Missing or
  /// unparseable dates have no follow-up.
  pub fn classify(next_due: Option<&str>, today: NaiveDate) -> Self {
    let Some(raw) = next_due.filter(|s| !s.trim().is_empty()) else {
      return DueStatus::NoFollowUp;
    };
    let Ok(due) = NaiveDate::parse_from_str(date_part(raw.trim()), "%Y-%m-%d") else {
      tracing::debug!(value = raw, "unparseable nextDueDate");
      return DueStatus::NoFollowUp;
    };

    let days = (due - today).num_days();
    if days < 0 {
      DueStatus::Overdue
    } else if days <= DUE_SOON_DAYS {
      DueStatus::DueSoon
    } else {
      DueStatus::UpToDate
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      DueStatus::Overdue => "Overdue",
      DueStatus::DueSoon => "Due Soon",
      DueStatus::UpToDate => "Up to Date",
      DueStatus::NoFollowUp => "No Follow-up",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineRecordCreate {
  pub pet_id: i64,
  pub vaccine_id: i64,
  pub veterinarian_id: String,
  pub vaccine_stock_id: i64,
  pub vaccination_date: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineRecordUpdate {
  pub pet_id: i64,
  pub vaccine_id: i64,
  pub veterinarian_id: String,
  pub vaccine_stock_id: i64,
  pub vaccination_date: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_due_date: Option<String>,
  pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineRecordSearch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pet_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub vaccine_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub veterinarian_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub vaccine_stock_id: Option<i64>,
}

impl SearchCriteria for VaccineRecordSearch {
  fn is_empty(&self) -> bool {
    self.id.is_none()
      && self.pet_id.is_none()
      && self.vaccine_id.is_none()
      && self.veterinarian_id.is_none()
      && self.vaccine_stock_id.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn test_due_within_thirty_days_is_due_soon() {
    let today = day("2024-06-01");
    assert_eq!(
      DueStatus::classify(Some("2024-06-20"), today),
      DueStatus::DueSoon
    );
    assert_eq!(
      DueStatus::classify(Some("2024-07-01T00:00:00"), today),
      DueStatus::DueSoon
    );
    assert_eq!(
      DueStatus::classify(Some("2024-06-01"), today),
      DueStatus::DueSoon
    );
  }

  #[test]
  fn test_past_due_is_overdue() {
    let today = day("2024-06-01");
    assert_eq!(
      DueStatus::classify(Some("2024-05-31"), today),
      DueStatus::Overdue
    );
  }

  #[test]
  fn test_far_future_is_up_to_date() {
    let today = day("2024-06-01");
    assert_eq!(
      DueStatus::classify(Some("2024-07-02"), today),
      DueStatus::UpToDate
    );
  }

  #[test]
  fn test_absent_due_date_has_no_follow_up() {
    let today = day("2024-06-01");
    assert_eq!(DueStatus::classify(None, today), DueStatus::NoFollowUp);
    assert_eq!(DueStatus::classify(Some(""), today), DueStatus::NoFollowUp);
    assert_eq!(DueStatus::NoFollowUp.label(), "No Follow-up");
  }

  #[test]
  fn test_record_navigation_names() {
    let json = r#"{
      "id": 1,
      "petId": 3,
      "vaccineId": 2,
      "veterinarianId": "vet-1",
      "vaccineStockId": 9,
      "vaccinationDate": "2024-05-01T00:00:00",
      "version": 1,
      "pet": {"id": 3, "name": "Pamuk", "owner": {"firstName": "Ayşe", "lastName": "Yılmaz"}},
      "veterinarian": {"id": "vet-1", "firstName": "Mehmet", "lastName": "Demir"}
    }"#;
    let record: VaccineRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.pet_name(), "Pamuk");
    assert_eq!(record.owner_name(), "Ayşe Yılmaz");
    assert_eq!(record.veterinarian_name(), "Mehmet Demir");
    assert_eq!(record.vaccine_name(), "-");
  }
}
