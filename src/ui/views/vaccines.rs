use crate::api::{CachedClient, Vaccines};
use crate::models::{date_part, non_empty, parse_id, Vaccine, VaccineSearch};
use crate::ui::components::{Field, Form};
use crate::ui::view::View;
use crate::ui::views::forms::{EntityForm, VaccineForm};
use crate::ui::views::list::ListSpec;

pub struct VaccineList;

impl ListSpec for VaccineList {
  type R = Vaccines;

  const TITLE: &'static str = "Vaccines";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("ID", 5),
    ("Name", 24),
    ("Manufacturer", 24),
    ("Created", 10),
  ];

  fn cells(vaccine: &Vaccine) -> Vec<String> {
    vec![
      vaccine.id.to_string(),
      vaccine.name.clone(),
      vaccine.manufacturer.clone(),
      vaccine
        .created_at
        .as_deref()
        .map(date_part)
        .unwrap_or("-")
        .to_string(),
    ]
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("id", "ID"),
      Field::text("name", "Name"),
      Field::text("manufacturer", "Manufacturer"),
    ]
  }

  fn criteria(form: &Form) -> VaccineSearch {
    VaccineSearch {
      id: parse_id(form.value("id")),
      name: non_empty(form.value("name")),
      manufacturer: non_empty(form.value("manufacturer")),
    }
  }

  fn id(vaccine: &Vaccine) -> i64 {
    vaccine.id
  }

  fn describe(vaccine: &Vaccine) -> String {
    vaccine.name.clone()
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<VaccineForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, vaccine: &Vaccine) -> Box<dyn View> {
    Box::new(EntityForm::<VaccineForm>::edit(client, vaccine.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{tick_until, FakeBackend};
  use crate::ui::view::ViewAction;
  use crate::ui::views::list::ListView;
  use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

  #[tokio::test]
  async fn test_rows_and_search() {
    let backend = FakeBackend::start().await;
    let mut view = ListView::<VaccineList>::new(&backend.client());
    tick_until(&mut view, |v| !v.is_loading()).await;
    assert_eq!(view.rows().len(), 2);
    assert_eq!(VaccineList::cells(&view.rows()[0]), ["1", "Rabies", "Zoetis", "-"]);

    view.search_form_mut().set_value("name", "Rab");
    view.search_form_mut().set_value("id", "abc");
    view.apply_search();
    tick_until(&mut view, |v| !v.is_loading()).await;
    assert_eq!(
      backend.last_body("POST /Vaccines/Search").unwrap(),
      serde_json::json!({"name": "Rab"})
    );
    assert_eq!(view.rows().len(), 1);
  }

  #[tokio::test]
  async fn test_saving_a_vaccine_reloads_the_list() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let mut list = ListView::<VaccineList>::new(&client);
    tick_until(&mut list, |v| !v.is_loading()).await;
    assert_eq!(backend.count("GET /Vaccines"), 1);

    let new = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
    let ViewAction::Push(mut form) = list.handle_key(new) else {
      panic!("expected the create form");
    };
    assert_eq!(form.breadcrumb_label(), "New vaccine");
    for c in "Distemper".chars() {
      form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    form.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
    for c in "Zoetis".chars() {
      form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    form.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    let mut finished = false;
    for _ in 0..300 {
      tokio::time::sleep(std::time::Duration::from_millis(10)).await;
      if matches!(form.tick(), ViewAction::Finish(_)) {
        finished = true;
        break;
      }
    }
    assert!(finished);
    assert_eq!(backend.count("POST /Vaccines"), 1);

    tick_until(&mut list, |v| backend.count("GET /Vaccines") == 2 && !v.is_loading()).await;
  }
}
