use super::{lookup, sync_choices, FormSpec};
use crate::api::{
  ApiError, CachedClient, Pets, VaccineRecords, VaccineStocks, Vaccines, Veterinarians,
};
use crate::models::{
  date_part, non_empty, parse_id, Pet, Vaccine, VaccineRecord, VaccineRecordCreate,
  VaccineRecordUpdate, VaccineStock, Veterinarian,
};
use crate::query::Query;
use crate::ui::components::{Choice, Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

pub struct VaccineRecordForm {
  pets: Query<Vec<Pet>>,
  vaccines: Query<Vec<Vaccine>>,
  stocks: Query<Vec<VaccineStock>>,
  veterinarians: Query<Vec<Veterinarian>>,
}

fn all<R: crate::api::Resource>(client: &CachedClient) -> Query<Vec<R::Entity>> {
  let client = client.clone();
  lookup(move || {
    let client = client.clone();
    async move { client.list::<R>(None).await.map_err(|e| e.user_message()) }
  })
}

impl FormSpec for VaccineRecordForm {
  type R = VaccineRecords;

  fn fields() -> Vec<Field> {
    vec![
      Field::select("petId", "Pet", "Select pet").rules(vec![Rule::Required("Pet is required")]),
      Field::select("vaccineId", "Vaccine", "Select vaccine")
        .rules(vec![Rule::Required("Vaccine is required")]),
      Field::select("vaccineStockId", "Stock", "Select stock")
        .rules(vec![Rule::Required("Vaccine stock is required")]),
      Field::select("veterinarianId", "Veterinarian", "Select veterinarian")
        .rules(vec![Rule::Required("Veterinarian is required")]),
      Field::text("vaccinationDate", "Date (YYYY-MM-DD)")
        .max_len(10)
        .rules(vec![
          Rule::Required("Vaccination date is required"),
          Rule::Date("Use YYYY-MM-DD"),
        ]),
      Field::text("nextDueDate", "Next due (YYYY-MM-DD)")
        .max_len(10)
        .rules(vec![Rule::Date("Use YYYY-MM-DD")]),
    ]
  }

  fn open(client: &CachedClient) -> Self {
    Self {
      pets: all::<Pets>(client),
      vaccines: all::<Vaccines>(client),
      stocks: all::<VaccineStocks>(client),
      veterinarians: all::<Veterinarians>(client),
    }
  }

  fn fill(&mut self, form: &mut Form, record: &VaccineRecord) {
    form.set_value("petId", &record.pet_id.to_string());
    form.set_value("vaccineId", &record.vaccine_id.to_string());
    form.set_value("vaccineStockId", &record.vaccine_stock_id.to_string());
    form.set_value("veterinarianId", &record.veterinarian_id);
    form.set_value("vaccinationDate", date_part(&record.vaccination_date));
    form.set_value(
      "nextDueDate",
      record.next_due_date.as_deref().map(date_part).unwrap_or(""),
    );
  }

  fn tick(&mut self, form: &mut Form) {
    sync_choices(&mut self.pets, form, "petId", |p| {
      Choice::new(p.id, format!("{} ({})", p.name, p.owner_name()))
    });
    sync_choices(&mut self.vaccines, form, "vaccineId", |v| {
      Choice::new(v.id, v.name.clone())
    });
    sync_choices(&mut self.stocks, form, "vaccineStockId", |s| {
      Choice::new(
        s.id,
        format!("{} - {} ({} left)", s.serial_id, s.vaccine_name(), s.quantity),
      )
    });
    sync_choices(&mut self.veterinarians, form, "veterinarianId", |v| {
      Choice::new(&v.id, v.full_name())
    });
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&VaccineRecord>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let pet_id = parse_id(form.value("petId")).unwrap_or_default();
    let vaccine_id = parse_id(form.value("vaccineId")).unwrap_or_default();
    let vaccine_stock_id = parse_id(form.value("vaccineStockId")).unwrap_or_default();
    let veterinarian_id = form.value("veterinarianId").to_string();
    let vaccination_date = form.value("vaccinationDate").trim().to_string();
    let next_due_date = non_empty(form.value("nextDueDate"));

    match editing {
      None => {
        let payload = VaccineRecordCreate {
          pet_id,
          vaccine_id,
          veterinarian_id,
          vaccine_stock_id,
          vaccination_date,
          next_due_date,
        };
        async move { client.create::<VaccineRecords>(&payload).await.map(drop) }.boxed()
      }
      Some(record) => {
        let id = record.id;
        let payload = VaccineRecordUpdate {
          pet_id,
          vaccine_id,
          veterinarian_id,
          vaccine_stock_id,
          vaccination_date,
          next_due_date,
          version: record.version,
        };
        async move { client.update::<VaccineRecords>(&id, &payload).await.map(drop) }.boxed()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{tick_until, FakeBackend};
  use crate::ui::view::{View, ViewAction};
  use crate::ui::views::forms::EntityForm;
  use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

  #[tokio::test]
  async fn test_create_with_all_lookups() {
    let backend = FakeBackend::start().await;
    let mut view = EntityForm::<VaccineRecordForm>::create(&backend.client());
    tick_until(&mut view, |v| {
      ["petId", "vaccineId", "vaccineStockId", "veterinarianId"]
        .iter()
        .all(|k| !v.form().choices(k).is_empty())
    })
    .await;
    assert_eq!(view.form().choices("petId")[0].label, "Pamuk (Ali Kaya)");
    assert_eq!(
      view.form().choices("vaccineStockId")[0].label,
      "RB-001 - Rabies (20 left)"
    );

    let form = view.form_mut();
    form.set_value("petId", "1");
    form.set_value("vaccineId", "1");
    form.set_value("vaccineStockId", "5");
    form.set_value("veterinarianId", "vet-1");
    form.set_value("vaccinationDate", "2024-06-01");
    view.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    let action = tick_until(&mut view, |v| !v.is_submitting()).await;
    assert!(matches!(action, ViewAction::Finish(_)));
    let body = backend.last_body("POST /VaccineRecords").unwrap();
    assert_eq!(body["veterinarianId"], "vet-1");
    assert_eq!(body["vaccineStockId"], 5);
    assert!(body.get("nextDueDate").is_none());
  }
}
