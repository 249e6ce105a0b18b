use super::FormSpec;
use crate::api::{ApiError, CachedClient, Vaccines};
use crate::models::{Vaccine, VaccineCreate, VaccineUpdate};
use crate::ui::components::{Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

pub struct VaccineForm;

impl FormSpec for VaccineForm {
  type R = Vaccines;

  fn fields() -> Vec<Field> {
    vec![
      Field::text("name", "Name").max_len(255).rules(vec![
        Rule::Required("Vaccine name is required"),
        Rule::MinLen(2, "Minimum 2 characters"),
        Rule::MaxLen(255, "Maximum 255 characters"),
      ]),
      Field::text("manufacturer", "Manufacturer")
        .max_len(255)
        .rules(vec![
          Rule::Required("Manufacturer is required"),
          Rule::MinLen(2, "Minimum 2 characters"),
          Rule::MaxLen(255, "Maximum 255 characters"),
        ]),
    ]
  }

  fn open(_client: &CachedClient) -> Self {
    VaccineForm
  }

  fn fill(&mut self, form: &mut Form, vaccine: &Vaccine) {
    form.set_value("name", &vaccine.name);
    form.set_value("manufacturer", &vaccine.manufacturer);
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Vaccine>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let name = form.value("name").trim().to_string();
    let manufacturer = form.value("manufacturer").trim().to_string();
    match editing {
      None => {
        let payload = VaccineCreate { name, manufacturer };
        async move { client.create::<Vaccines>(&payload).await.map(drop) }.boxed()
      }
      Some(vaccine) => {
        let id = vaccine.id;
        let payload = VaccineUpdate {
          name,
          manufacturer,
          version: vaccine.version,
        };
        async move { client.update::<Vaccines>(&id, &payload).await.map(drop) }.boxed()
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

  fn enter() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
  }

  #[tokio::test]
  async fn test_short_name_blocks_submit() {
    let backend = FakeBackend::start().await;
    let mut view = EntityForm::<VaccineForm>::create(&backend.client());
    view.form_mut().set_value("name", "R");
    view.form_mut().set_value("manufacturer", "Zoetis");

    assert!(matches!(view.handle_key(enter()), ViewAction::None));
    assert_eq!(view.form().error("name"), Some("Minimum 2 characters"));
    assert!(!view.is_submitting());
    assert_eq!(backend.total(), 0);
  }

  #[tokio::test]
  async fn test_create_posts_trimmed_fields() {
    let backend = FakeBackend::start().await;
    let mut view = EntityForm::<VaccineForm>::create(&backend.client());
    view.form_mut().set_value("name", "  Parvovirus ");
    view.form_mut().set_value("manufacturer", "Boehringer");

    view.handle_key(enter());
    let action = tick_until(&mut view, |v| !v.is_submitting()).await;
    assert!(matches!(action, ViewAction::Finish(ref m) if m == "Created vaccine"));
    assert_eq!(
      backend.last_body("POST /Vaccines").unwrap(),
      serde_json::json!({"name": "Parvovirus", "manufacturer": "Boehringer"})
    );
  }

  #[tokio::test]
  async fn test_edit_prefills_and_sends_version() {
    let backend = FakeBackend::start().await;
    let mut view = EntityForm::<VaccineForm>::edit(&backend.client(), 2);
    tick_until(&mut view, |v| !v.form().value("name").is_empty()).await;
    assert_eq!(view.form().value("name"), "Leptospirosis");
    assert_eq!(view.form().value("manufacturer"), "MSD");

    view.form_mut().set_value("manufacturer", "MSD Animal Health");
    view.handle_key(enter());
    let action = tick_until(&mut view, |v| !v.is_submitting()).await;
    assert!(matches!(action, ViewAction::Finish(ref m) if m == "Updated vaccine"));
    assert_eq!(
      backend.last_body("PUT /Vaccines/2").unwrap(),
      serde_json::json!({
        "name": "Leptospirosis",
        "manufacturer": "MSD Animal Health",
        "version": 1
      })
    );
  }
}
