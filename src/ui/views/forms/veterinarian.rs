use super::FormSpec;
use crate::api::{ApiError, CachedClient, Veterinarians};
use crate::models::{non_empty, Veterinarian, VeterinarianUpdate};
use crate::ui::components::{Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

/// Profile edit for an existing account. Accounts are created by signing up.
pub struct VeterinarianForm;

impl FormSpec for VeterinarianForm {
  type R = Veterinarians;

  fn fields() -> Vec<Field> {
    vec![
      Field::text("firstName", "First name").rules(vec![
        Rule::Required("First name is required"),
        Rule::MinLen(2, "First name must be at least 2 characters"),
      ]),
      Field::text("lastName", "Last name").rules(vec![
        Rule::Required("Last name is required"),
        Rule::MinLen(2, "Last name must be at least 2 characters"),
      ]),
      Field::text("licenseNumber", "License number"),
    ]
  }

  fn open(_client: &CachedClient) -> Self {
    VeterinarianForm
  }

  fn fill(&mut self, form: &mut Form, vet: &Veterinarian) {
    form.set_value("firstName", &vet.first_name);
    form.set_value("lastName", &vet.last_name);
    form.set_value("licenseNumber", vet.license_number.as_deref().unwrap_or(""));
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Veterinarian>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let Some(vet) = editing else {
      return futures::future::ready(Err(ApiError::Rejected {
        message: Some("Veterinarians are added by signing up".to_string()),
      }))
      .boxed();
    };
    let id = vet.id.clone();
    let payload = VeterinarianUpdate {
      first_name: form.value("firstName").trim().to_string(),
      last_name: form.value("lastName").trim().to_string(),
      license_number: non_empty(form.value("licenseNumber")),
      version: vet.version,
    };
    async move { client.update::<Veterinarians>(&id, &payload).await.map(drop) }.boxed()
  }
}
