use super::FormSpec;
use crate::api::{ApiError, CachedClient, Owners};
use crate::models::{non_empty, Owner, OwnerCreate, OwnerUpdate};
use crate::ui::components::{Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

const PHONE: Rule = Rule::Digits {
  min: 10,
  max: 11,
  message: "Phone must be 10-11 digits",
};

pub struct OwnerForm;

impl FormSpec for OwnerForm {
  type R = Owners;

  fn fields() -> Vec<Field> {
    vec![
      Field::text("firstName", "First name").rules(vec![
        Rule::Required("First name is required"),
        Rule::MinLen(2, "Minimum 2 characters"),
      ]),
      Field::text("lastName", "Last name").rules(vec![
        Rule::Required("Last name is required"),
        Rule::MinLen(2, "Minimum 2 characters"),
      ]),
      Field::text("tcKimlikNo", "TC Kimlik No")
        .max_len(11)
        .rules(vec![
          Rule::Required("TC Kimlik No is required"),
          Rule::Digits {
            min: 11,
            max: 11,
            message: "TC Kimlik No must be 11 digits",
          },
        ]),
      Field::text("phoneNumber", "Phone")
        .max_len(11)
        .rules(vec![Rule::Required("Phone number is required"), PHONE]),
      Field::text("address", "Address").rules(vec![
        Rule::Required("Address is required"),
        Rule::MinLen(10, "Minimum 10 characters"),
      ]),
      Field::text("emergencyPerson", "Emergency contact"),
      Field::text("emergencyPhone", "Emergency phone")
        .max_len(11)
        .rules(vec![PHONE]),
    ]
  }

  fn open(_client: &CachedClient) -> Self {
    OwnerForm
  }

  fn fill(&mut self, form: &mut Form, owner: &Owner) {
    form.set_value("firstName", &owner.first_name);
    form.set_value("lastName", &owner.last_name);
    form.set_value("tcKimlikNo", &owner.national_id);
    form.set_value("phoneNumber", &owner.phone_number);
    form.set_value("address", &owner.address);
    form.set_value("emergencyPerson", owner.emergency_person.as_deref().unwrap_or(""));
    form.set_value("emergencyPhone", owner.emergency_phone.as_deref().unwrap_or(""));
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Owner>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let first_name = form.value("firstName").trim().to_string();
    let last_name = form.value("lastName").trim().to_string();
    let national_id = form.value("tcKimlikNo").trim().to_string();
    let address = form.value("address").trim().to_string();
    let phone_number = form.value("phoneNumber").trim().to_string();
    let emergency_person = non_empty(form.value("emergencyPerson"));
    let emergency_phone = non_empty(form.value("emergencyPhone"));

    match editing {
      None => {
        let payload = OwnerCreate {
          first_name,
          last_name,
          national_id,
          address,
          phone_number,
          emergency_person,
          emergency_phone,
        };
        async move { client.create::<Owners>(&payload).await.map(drop) }.boxed()
      }
      Some(owner) => {
        let id = owner.id;
        let payload = OwnerUpdate {
          first_name,
          last_name,
          national_id,
          address,
          phone_number,
          emergency_person,
          emergency_phone,
          version: owner.version,
        };
        async move { client.update::<Owners>(&id, &payload).await.map(drop) }.boxed()
      }
    }
  }
}
