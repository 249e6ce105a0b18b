use crate::api::{CachedClient, VaccineRecords};
use crate::models::{date_part, non_empty, parse_id, VaccineRecord, VaccineRecordSearch};
use crate::ui::components::{Field, Form};
use crate::ui::renderfns::due_status_color;
use crate::ui::view::View;
use crate::ui::views::forms::{EntityForm, VaccineRecordForm};
use crate::ui::views::list::ListSpec;
use ratatui::prelude::*;

const STATUS_COLUMN: usize = 7;

pub struct VaccineRecordList;

impl ListSpec for VaccineRecordList {
  type R = VaccineRecords;

  const TITLE: &'static str = "Vaccine records";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("ID", 5),
    ("Pet", 12),
    ("Owner", 16),
    ("Vaccine", 14),
    ("Veterinarian", 16),
    ("Date", 10),
    ("Due", 10),
    ("Status", 12),
  ];

  fn cells(record: &VaccineRecord) -> Vec<String> {
    let today = chrono::Local::now().date_naive();
    vec![
      record.id.to_string(),
      record.pet_name().to_string(),
      record.owner_name(),
      record.vaccine_name().to_string(),
      record.veterinarian_name(),
      date_part(&record.vaccination_date).to_string(),
      record
        .next_due_date
        .as_deref()
        .map(date_part)
        .unwrap_or("-")
        .to_string(),
      record.due_status(today).label().to_string(),
    ]
  }

  fn cell_style(record: &VaccineRecord, column: usize) -> Style {
    if column != STATUS_COLUMN {
      return Style::default();
    }
    let status = record.due_status(chrono::Local::now().date_naive());
    Style::default().fg(due_status_color(status))
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("petId", "Pet ID"),
      Field::text("vaccineId", "Vaccine ID"),
      Field::text("veterinarianId", "Veterinarian ID"),
      Field::text("vaccineStockId", "Stock ID"),
    ]
  }

  fn criteria(form: &Form) -> VaccineRecordSearch {
    VaccineRecordSearch {
      id: None,
      pet_id: parse_id(form.value("petId")),
      vaccine_id: parse_id(form.value("vaccineId")),
      veterinarian_id: non_empty(form.value("veterinarianId")),
      vaccine_stock_id: parse_id(form.value("vaccineStockId")),
    }
  }

  fn id(record: &VaccineRecord) -> i64 {
    record.id
  }

  fn describe(record: &VaccineRecord) -> String {
    format!("{} for {}", record.vaccine_name(), record.pet_name())
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<VaccineRecordForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, record: &VaccineRecord) -> Box<dyn View> {
    Box::new(EntityForm::<VaccineRecordForm>::edit(client, record.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{fixtures, tick_until, FakeBackend};
  use crate::ui::views::list::ListView;

  fn record_due(next_due: Option<String>) -> VaccineRecord {
    let mut raw = fixtures("VaccineRecords")[0].clone();
    raw["nextDueDate"] = serde_json::json!(next_due);
    serde_json::from_value(raw).unwrap()
  }

  fn in_days(days: i64) -> Option<String> {
    let day = chrono::Local::now().date_naive() + chrono::Duration::days(days);
    Some(format!("{}T00:00:00", day.format("%Y-%m-%d")))
  }

  #[tokio::test]
  async fn test_list_rows_show_names_and_overdue_status() {
    let backend = FakeBackend::start().await;
    let mut view = ListView::<VaccineRecordList>::new(&backend.client());
    tick_until(&mut view, |v| !v.is_loading()).await;

    let record = &view.rows()[0];
    let cells = VaccineRecordList::cells(record);
    assert_eq!(
      cells,
      [
        "9",
        "Pamuk",
        "Ali Kaya",
        "Rabies",
        "Mehmet Demir",
        "2024-02-01",
        "2025-02-01",
        "Overdue"
      ]
    );
    assert_eq!(
      VaccineRecordList::cell_style(record, STATUS_COLUMN).fg,
      Some(Color::Red)
    );
    assert_eq!(VaccineRecordList::cell_style(record, 1), Style::default());
  }

  #[test]
  fn test_status_column_follows_next_due_date() {
    let cases = [
      (in_days(10), "Due Soon", Color::Yellow),
      (in_days(0), "Due Soon", Color::Yellow),
      (in_days(90), "Up to Date", Color::Green),
      (in_days(-1), "Overdue", Color::Red),
      (None, "No Follow-up", Color::DarkGray),
    ];
    for (next_due, label, color) in cases {
      let record = record_due(next_due.clone());
      assert_eq!(VaccineRecordList::cells(&record)[STATUS_COLUMN], label, "{:?}", next_due);
      assert_eq!(
        VaccineRecordList::cell_style(&record, STATUS_COLUMN).fg,
        Some(color),
        "{:?}",
        next_due
      );
    }
    assert_eq!(VaccineRecordList::cells(&record_due(None))[6], "-");
  }
}
