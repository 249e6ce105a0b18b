use super::{lookup, sync_choices, FormSpec};
use crate::api::{ApiError, CachedClient, Owners, Pets};
use crate::models::{
  non_empty, parse_id, Code, Gender, Owner, Pet, PetCreate, PetUpdate, SelectOption,
};
use crate::query::Query;
use crate::ui::components::{Choice, Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

/// Pet form. Breeds follow the chosen species: picking a species clears the
/// breed and reloads its choices, no species leaves the breed disabled.
pub struct PetForm {
  client: CachedClient,
  owners: Query<Vec<Owner>>,
  species: Query<Vec<SelectOption>>,
  breeds: Option<Query<Vec<Code>>>,
}

impl PetForm {
  fn load_breeds(&mut self, species_id: i64) {
    let client = self.client.clone();
    self.breeds = Some(lookup(move || {
      let client = client.clone();
      async move {
        client
          .breeds_for_species(species_id)
          .await
          .map_err(|e| e.user_message())
      }
    }));
  }
}

impl FormSpec for PetForm {
  type R = Pets;

  fn fields() -> Vec<Field> {
    let genders = Gender::ALL
      .iter()
      .map(|g| Choice::new(g.code(), g.label()))
      .collect();

    vec![
      Field::text("name", "Name").rules(vec![
        Rule::Required("Pet name is required"),
        Rule::MinLen(2, "Minimum 2 characters"),
      ]),
      Field::text("microchipNumber", "Microchip")
        .max_len(15)
        .rules(vec![
          Rule::Required("Microchip number is required"),
          Rule::Digits {
            min: 15,
            max: 15,
            message: "Microchip must be 15 digits",
          },
        ]),
      Field::text("petPassportNumber", "Passport no"),
      Field::select("gender", "Gender", "Select gender")
        .choices(genders)
        .rules(vec![Rule::Required("Gender is required")]),
      Field::text("color", "Color")
        .max_len(30)
        .rules(vec![Rule::MaxLen(30, "Maximum 30 characters")]),
      Field::select("ownerId", "Owner", "Select owner")
        .rules(vec![Rule::Required("Owner is required")]),
      Field::select("speciesId", "Species", "Select species")
        .rules(vec![Rule::Required("Species is required")]),
      Field::select("breedId", "Breed", "Select species first")
        .disabled()
        .rules(vec![Rule::Required("Breed is required")]),
    ]
  }

  fn open(client: &CachedClient) -> Self {
    let owners_client = client.clone();
    let species_client = client.clone();
    Self {
      client: client.clone(),
      owners: lookup(move || {
        let client = owners_client.clone();
        async move { client.list::<Owners>(None).await.map_err(|e| e.user_message()) }
      }),
      species: lookup(move || {
        let client = species_client.clone();
        async move { client.species_options().await.map_err(|e| e.user_message()) }
      }),
      breeds: None,
    }
  }

  fn fill(&mut self, form: &mut Form, pet: &Pet) {
    form.set_value("name", &pet.name);
    form.set_value("microchipNumber", &pet.microchip_number);
    form.set_value("petPassportNumber", pet.pet_passport_number.as_deref().unwrap_or(""));
    form.set_value("gender", &pet.gender.to_string());
    form.set_value("color", pet.color.as_deref().unwrap_or(""));
    form.set_value("ownerId", &pet.owner_id.to_string());
    form.set_value("speciesId", &pet.species_id.to_string());

    form.set_enabled("breedId", pet.species_id > 0);
    form.set_value("breedId", &pet.breed_id.to_string());
    self.load_breeds(pet.species_id);
  }

  fn tick(&mut self, form: &mut Form) {
    sync_choices(&mut self.owners, form, "ownerId", |o| {
      Choice::new(o.id, o.full_name())
    });
    sync_choices(&mut self.species, form, "speciesId", |s| {
      Choice::new(s.value, s.label.clone())
    });
    if let Some(breeds) = &mut self.breeds {
      sync_choices(breeds, form, "breedId", |b| {
        Choice::new(b.id, b.code_name.clone())
      });
    }
  }

  fn changed(&mut self, form: &mut Form, key: &'static str) {
    if key != "speciesId" {
      return;
    }
    form.set_value("breedId", "");
    form.set_choices("breedId", Vec::new());
    match parse_id(form.value("speciesId")) {
      Some(species_id) => {
        form.set_enabled("breedId", true);
        self.load_breeds(species_id);
      }
      None => {
        form.set_enabled("breedId", false);
        self.breeds = None;
      }
    }
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Pet>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let id_of = |key: &str| parse_id(form.value(key)).unwrap_or_default();
    let name = form.value("name").trim().to_string();
    let microchip_number = form.value("microchipNumber").trim().to_string();
    let pet_passport_number = non_empty(form.value("petPassportNumber"));
    let gender = form.value("gender").parse().unwrap_or_default();
    let color = non_empty(form.value("color"));
    let species_id = id_of("speciesId");
    let breed_id = id_of("breedId");
    let owner_id = id_of("ownerId");

    match editing {
      None => {
        let payload = PetCreate {
          name,
          microchip_number,
          pet_passport_number,
          gender,
          color,
          species_id,
          breed_id,
          owner_id,
        };
        async move { client.create::<Pets>(&payload).await.map(drop) }.boxed()
      }
      Some(pet) => {
        let id = pet.id;
        let payload = PetUpdate {
          name,
          microchip_number,
          pet_passport_number,
          gender,
          color,
          species_id,
          breed_id,
          owner_id,
          version: pet.version,
        };
        async move { client.update::<Pets>(&id, &payload).await.map(drop) }.boxed()
      }
    }
  }
}
