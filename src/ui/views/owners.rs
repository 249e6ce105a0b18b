use crate::api::{CachedClient, Owners};
use crate::cache::EntityTag;
use crate::models::{non_empty, parse_id, Owner, OwnerSearch};
use crate::query::Query;
use crate::ui::components::{Field, Form};
use crate::ui::view::View;
use crate::ui::views::detail::{DetailSpec, DetailView, Related};
use crate::ui::views::forms::{EntityForm, OwnerForm};
use crate::ui::views::list::ListSpec;

pub struct OwnerList;

impl ListSpec for OwnerList {
  type R = Owners;

  const TITLE: &'static str = "Owners";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("ID", 5),
    ("First name", 14),
    ("Last name", 14),
    ("TC Kimlik No", 12),
    ("Phone", 12),
    ("Address", 32),
  ];

  fn cells(owner: &Owner) -> Vec<String> {
    vec![
      owner.id.to_string(),
      owner.first_name.clone(),
      owner.last_name.clone(),
      owner.national_id.clone(),
      owner.phone_number.clone(),
      owner.address.clone(),
    ]
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("id", "ID"),
      Field::text("firstName", "First name"),
      Field::text("lastName", "Last name"),
      Field::text("tcKimlikNo", "TC Kimlik No").max_len(11),
      Field::text("phoneNumber", "Phone"),
    ]
  }

  fn criteria(form: &Form) -> OwnerSearch {
    OwnerSearch {
      id: parse_id(form.value("id")),
      first_name: non_empty(form.value("firstName")),
      last_name: non_empty(form.value("lastName")),
      national_id: non_empty(form.value("tcKimlikNo")),
      phone_number: non_empty(form.value("phoneNumber")),
    }
  }

  fn id(owner: &Owner) -> i64 {
    owner.id
  }

  fn describe(owner: &Owner) -> String {
    owner.full_name()
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<OwnerForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, owner: &Owner) -> Box<dyn View> {
    Box::new(EntityForm::<OwnerForm>::edit(client, owner.id))
  }

  fn detail_view(client: &CachedClient, owner: &Owner) -> Option<Box<dyn View>> {
    Some(Box::new(DetailView::<OwnerList>::new(client, owner.id)))
  }
}

impl DetailSpec for OwnerList {
  fn fields(owner: &Owner) -> Vec<(&'static str, String)> {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    vec![
      ("ID", owner.id.to_string()),
      ("Name", owner.full_name()),
      ("TC Kimlik No", owner.national_id.clone()),
      ("Phone", owner.phone_number.clone()),
      ("Address", owner.address.clone()),
      ("Emergency contact", or_dash(&owner.emergency_person)),
      ("Emergency phone", or_dash(&owner.emergency_phone)),
    ]
  }

  fn related(client: &CachedClient, id: &i64) -> Option<Related> {
    let client = client.clone();
    let owner_id = *id;
    Some(Related {
      title: "Pets",
      tag: EntityTag::Pets,
      query: Query::new(move || {
        let client = client.clone();
        async move {
          let pets = client
            .pets_of_owner(owner_id)
            .await
            .map_err(|e| e.user_message())?;
          Ok::<Vec<String>, String>(
            pets
              .iter()
              .map(|p| {
                format!(
                  "#{} {}  {} / {}  {}",
                  p.id,
                  p.name,
                  p.species_name(),
                  p.breed_name(),
                  p.microchip_number
                )
              })
              .collect(),
          )
        }
      }),
    })
  }
}
