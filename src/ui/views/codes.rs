use crate::api::{CachedClient, Codes};
use crate::models::{non_empty, parse_id, Code, CodeSearch, CodeType};
use crate::ui::components::{Choice, Field, Form};
use crate::ui::view::View;
use crate::ui::views::forms::{CodeForm, EntityForm};
use crate::ui::views::list::ListSpec;

pub struct CodeList;

impl ListSpec for CodeList {
  type R = Codes;

  const TITLE: &'static str = "Codes";
  const COLUMNS: &'static [(&'static str, usize)] =
    &[("ID", 5), ("Type", 10), ("Name", 24), ("Parent", 8)];

  fn cells(code: &Code) -> Vec<String> {
    vec![
      code.id.to_string(),
      code.code_type.clone(),
      code.code_name.clone(),
      code
        .parent_id
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string()),
    ]
  }

  fn search_fields() -> Vec<Field> {
    let types = CodeType::ALL
      .iter()
      .map(|t| Choice::new(t.as_str(), t.as_str()))
      .collect();
    vec![
      Field::select("codeType", "Type", "Any").choices(types),
      Field::text("codeName", "Name"),
      Field::text("parentId", "Parent ID"),
    ]
  }

  fn criteria(form: &Form) -> CodeSearch {
    CodeSearch {
      id: None,
      code_type: non_empty(form.value("codeType")),
      code_name: non_empty(form.value("codeName")),
      parent_id: parse_id(form.value("parentId")),
    }
  }

  fn id(code: &Code) -> i64 {
    code.id
  }

  fn describe(code: &Code) -> String {
    format!("{} {}", code.code_type.to_lowercase(), code.code_name)
  }

  fn create_view(client: &CachedClient) -> Option<Box<dyn View>> {
    Some(Box::new(EntityForm::<CodeForm>::create(client)))
  }

  fn edit_view(client: &CachedClient, code: &Code) -> Box<dyn View> {
    Box::new(EntityForm::<CodeForm>::edit(client, code.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{tick_until, FakeBackend};
  use crate::ui::view::ViewAction;
  use crate::ui::views::list::ListView;
  use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

  fn press(view: &mut dyn View, code: KeyCode) -> ViewAction {
    view.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  #[tokio::test]
  async fn test_filter_by_type() {
    let backend = FakeBackend::start().await;
    let mut view = ListView::<CodeList>::new(&backend.client());
    tick_until(&mut view, |v| !v.is_loading()).await;
    assert_eq!(view.rows().len(), 5);
    assert_eq!(CodeList::cells(&view.rows()[0]), ["1", "Species", "Cat", "-"]);

    view.search_form_mut().set_value("codeType", "Breed");
    view.apply_search();
    tick_until(&mut view, |v| !v.is_loading()).await;

    assert_eq!(
      backend.last_body("POST /Codes/Search").unwrap(),
      serde_json::json!({"codeType": "Breed"})
    );
    let names: Vec<&str> = view.rows().iter().map(|c| c.code_name.as_str()).collect();
    assert_eq!(names, ["Van", "Tekir", "Kangal"]);
    assert_eq!(CodeList::cells(&view.rows()[0]), ["11", "Breed", "Van", "1"]);
  }

  #[tokio::test]
  async fn test_delete_breed_flashes_its_name() {
    let backend = FakeBackend::start().await;
    let mut view = ListView::<CodeList>::new(&backend.client());
    tick_until(&mut view, |v| !v.is_loading()).await;

    for _ in 0..3 {
      press(&mut view, KeyCode::Down);
    }
    press(&mut view, KeyCode::Char('d'));
    press(&mut view, KeyCode::Char('y'));
    let action = tick_until(&mut view, |_| false).await;

    assert!(matches!(action, ViewAction::Flash(ref m) if m == "Deleted breed Van"));
    assert_eq!(backend.count("DELETE /Codes/11"), 1);
  }
}
