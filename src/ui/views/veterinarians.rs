use crate::api::{CachedClient, Veterinarians};
use crate::models::{date_part, non_empty, Veterinarian, VeterinarianSearch};
use crate::ui::components::{Field, Form};
use crate::ui::view::View;
use crate::ui::views::detail::{DetailSpec, DetailView};
use crate::ui::views::forms::{EntityForm, VeterinarianForm};
use crate::ui::views::list::{ListSpec, RowAction};
use futures::future::FutureExt;
use ratatui::prelude::*;

fn status(vet: &Veterinarian) -> &'static str {
  if vet.active() {
    "Active"
  } else {
    "Disabled"
  }
}

pub struct VeterinarianList;

impl ListSpec for VeterinarianList {
  type R = Veterinarians;

  const TITLE: &'static str = "Veterinarians";
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("Username", 14),
    ("Name", 24),
    ("License", 12),
    ("Status", 9),
  ];
  const ROW_ACTION: Option<&'static str> = Some("(de)activate");
  const CAN_CREATE: bool = false;

  fn cells(vet: &Veterinarian) -> Vec<String> {
    vec![
      vet.user_name.clone(),
      vet.full_name(),
      vet.license_number.clone().unwrap_or_else(|| "-".to_string()),
      status(vet).to_string(),
    ]
  }

  fn cell_style(vet: &Veterinarian, column: usize) -> Style {
    match column {
      3 if vet.active() => Style::default().fg(Color::Green),
      3 => Style::default().fg(Color::DarkGray),
      _ => Style::default(),
    }
  }

  fn search_fields() -> Vec<Field> {
    vec![
      Field::text("userName", "Username"),
      Field::text("firstName", "First name"),
      Field::text("lastName", "Last name"),
      Field::text("licenseNumber", "License"),
    ]
  }

  fn criteria(form: &Form) -> VeterinarianSearch {
    VeterinarianSearch {
      user_name: non_empty(form.value("userName")),
      first_name: non_empty(form.value("firstName")),
      last_name: non_empty(form.value("lastName")),
      license_number: non_empty(form.value("licenseNumber")),
    }
  }

  fn id(vet: &Veterinarian) -> String {
    vet.id.clone()
  }

  fn describe(vet: &Veterinarian) -> String {
    vet.full_name()
  }

  fn create_view(_client: &CachedClient) -> Option<Box<dyn View>> {
    None
  }

  fn edit_view(client: &CachedClient, vet: &Veterinarian) -> Box<dyn View> {
    Box::new(EntityForm::<VeterinarianForm>::edit(client, vet.id.clone()))
  }

  fn detail_view(client: &CachedClient, vet: &Veterinarian) -> Option<Box<dyn View>> {
    Some(Box::new(DetailView::<VeterinarianList>::new(client, vet.id.clone())))
  }

  fn row_action(client: &CachedClient, vet: &Veterinarian) -> Option<RowAction> {
    let client = client.clone();
    let id = vet.id.clone();
    let name = vet.full_name();
    let action = if vet.active() {
      RowAction {
        done: format!("Deactivated {}", name),
        run: async move { client.deactivate_veterinarian(&id).await }.boxed(),
      }
    } else {
      RowAction {
        done: format!("Activated {}", name),
        run: async move { client.activate_veterinarian(&id).await }.boxed(),
      }
    };
    Some(action)
  }
}

impl DetailSpec for VeterinarianList {
  fn fields(vet: &Veterinarian) -> Vec<(&'static str, String)> {
    vec![
      ("Username", vet.user_name.clone()),
      ("Name", vet.full_name()),
      (
        "License",
        vet.license_number.clone().unwrap_or_else(|| "-".to_string()),
      ),
      ("Status", status(vet).to_string()),
      (
        "Joined",
        vet
          .created_at
          .as_deref()
          .map(date_part)
          .unwrap_or("-")
          .to_string(),
      ),
    ]
  }
}
