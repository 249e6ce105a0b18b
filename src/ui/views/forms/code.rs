use super::{lookup, sync_choices, FormSpec};
use crate::api::{ApiError, CachedClient, Codes};
use crate::models::{parse_id, Code, CodeCreate, CodeType, CodeUpdate};
use crate::query::Query;
use crate::ui::components::{Choice, Field, Form};
use crate::validation::Rule;
use futures::future::{BoxFuture, FutureExt};

/// Lookup code form. Only breeds carry a parent, which must be a species.
pub struct CodeForm {
  species: Query<Vec<Code>>,
}

fn is_breed(form: &Form) -> bool {
  CodeType::parse(form.value("codeType")) == Some(CodeType::Breed)
}

impl FormSpec for CodeForm {
  type R = Codes;

  fn fields() -> Vec<Field> {
    let types = CodeType::ALL
      .iter()
      .map(|t| Choice::new(t.as_str(), t.as_str()))
      .collect();
    vec![
      Field::select("codeType", "Type", "Select type")
        .choices(types)
        .rules(vec![Rule::Required("Code type is required")]),
      Field::text("codeName", "Name").rules(vec![
        Rule::Required("Code name is required"),
        Rule::MinLen(2, "Minimum 2 characters"),
      ]),
      Field::select("parentId", "Parent species", "Breeds only").disabled(),
    ]
  }

  fn open(client: &CachedClient) -> Self {
    let client = client.clone();
    Self {
      species: lookup(move || {
        let client = client.clone();
        async move {
          client
            .codes_of_type(CodeType::Species.as_str())
            .await
            .map_err(|e| e.user_message())
        }
      }),
    }
  }

  fn fill(&mut self, form: &mut Form, code: &Code) {
    form.set_value("codeType", &code.code_type);
    form.set_value("codeName", &code.code_name);
    form.set_enabled("parentId", is_breed(form));
    if let Some(parent) = code.parent_id {
      form.set_value("parentId", &parent.to_string());
    }
  }

  fn tick(&mut self, form: &mut Form) {
    sync_choices(&mut self.species, form, "parentId", |c| {
      Choice::new(c.id, c.code_name.clone())
    });
  }

  fn changed(&mut self, form: &mut Form, key: &'static str) {
    if key == "codeType" {
      let breed = is_breed(form);
      form.set_enabled("parentId", breed);
      if !breed {
        form.set_value("parentId", "");
      }
    }
  }

  fn check(form: &mut Form) -> bool {
    if is_breed(form) && form.value("parentId").is_empty() {
      form.set_error("parentId", "Parent species is required for breeds");
      return false;
    }
    true
  }

  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Code>,
  ) -> BoxFuture<'static, Result<(), ApiError>> {
    let code_type = form.value("codeType").to_string();
    let code_name = form.value("codeName").trim().to_string();
    let parent_id = if is_breed(form) {
      parse_id(form.value("parentId"))
    } else {
      None
    };

    match editing {
      None => {
        let payload = CodeCreate {
          code_type,
          code_name,
          parent_id,
        };
        async move { client.create::<Codes>(&payload).await.map(drop) }.boxed()
      }
      Some(code) => {
        let id = code.id;
        let payload = CodeUpdate {
          code_type,
          code_name,
          parent_id,
          version: code.version,
        };
        async move { client.update::<Codes>(&id, &payload).await.map(drop) }.boxed()
      }
    }
  }
}
