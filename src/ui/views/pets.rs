use crate::api::{CachedClient, Pets, VaccineRecords};
use crate::cache::EntityTag;
use crate::models::{date_part, non_empty, parse_id, Pet, PetSearch, VaccineRecordSearch};
use crate::query::Query;
use crate::ui::components::{Field, Form};
use crate::ui::view::View;
use crate::ui::views::detail::{DetailSpec, DetailView, Related};
use crate::ui::views::forms::{EntityForm, PetForm};
use crate::ui::views::list::ListSpec;

pub struct PetList;

impl ListSpec for PetList {
  type R = Pets;

  const TITLE: &'static str = "Pets";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("ID", 5),
    ("Name", 14),
    ("Microchip", 16),
    ("Species", 10),
    ("Breed", 14),
    ("Gender", 7),
    ("Owner", 20),
  ];

  fn cells(pet: &Pet) -> Vec<String> {
    vec![
      pet.id.to_string(),
      pet.name.clone(),
      pet.microchip_number.clone(),
      pet.species_name().to_string(),
      pet.breed_name().to_string(),
      pet.gender_label().to_string(),
      pet.owner_name(),
    ]
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("name", "Name"),
      Field::text("ownerId", "Owner ID"),
      Field::text("speciesId", "Species ID"),
      Field::text("breedId", "Breed ID"),
      Field::text("microchipNumber", "Microchip").max_len(15),
    ]
  }

  fn criteria(form: &Form) -> PetSearch {
    PetSearch {
      id: None,
      name: non_empty(form.value("name")),
      owner_id: parse_id(form.value("ownerId")),
      species_id: parse_id(form.value("speciesId")),
      breed_id: parse_id(form.value("breedId")),
      microchip_number: non_empty(form.value("microchipNumber")),
    }
  }

  fn id(pet: &Pet) -> i64 {
    pet.id
  }

  fn describe(pet: &Pet) -> String {
    pet.name.clone()
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<PetForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, pet: &Pet) -> Box<dyn View> {
    Box::new(EntityForm::<PetForm>::edit(client, pet.id))
  }

  fn detail_view(client: &CachedClient, pet: &Pet) -> Option<Box<dyn View>> {
    Some(Box::new(DetailView::<PetList>::new(client, pet.id)))
  }
}

impl DetailSpec for PetList {
  fn fields(pet: &Pet) -> Vec<(&'static str, String)> {
    vec![
      ("ID", pet.id.to_string()),
      ("Name", pet.name.clone()),
      ("Microchip", pet.microchip_number.clone()),
      (
        "Passport no",
        pet.pet_passport_number.clone().unwrap_or_else(|| "-".into()),
      ),
      ("Species", pet.species_name().to_string()),
      ("Breed", pet.breed_name().to_string()),
      ("Gender", pet.gender_label().to_string()),
      ("Color", pet.color.clone().unwrap_or_else(|| "-".into())),
      ("Owner", pet.owner_name()),
    ]
  }

  fn related(client: &CachedClient, id: &i64) -> Option<Related> {
    let client = client.clone();
    let criteria = VaccineRecordSearch {
      pet_id: Some(*id),
      ..Default::default()
    };
    Some(Related {
      title: "Vaccinations",
      tag: EntityTag::VaccineRecords,
      query: Query::new(move || {
        let client = client.clone();
        let criteria = criteria.clone();
        async move {
          let records = client
            .list::<VaccineRecords>(Some(&criteria))
            .await
            .map_err(|e| e.user_message())?;
          let today = chrono::Local::now().date_naive();
          Ok::<Vec<String>, String>(
            records
              .iter()
              .map(|r| {
                format!(
                  "{}  {}  by {}  next {} ({})",
                  date_part(&r.vaccination_date),
                  r.vaccine_name(),
                  r.veterinarian_name(),
                  r.next_due_date.as_deref().map(date_part).unwrap_or("-"),
                  r.due_status(today).label()
                )
              })
              .collect(),
          )
        }
      }),
    })
  }
}
