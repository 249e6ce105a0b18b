//! Create/edit views for each entity.
//!
//! [`EntityForm`] owns the lifecycle: load the entity when editing, run the
//! field rules on Enter, send one write through the cached client and pop
//! back on success. The per-entity [`FormSpec`] supplies fields, option
//! lookups and the payload.

mod code;
mod owner;
mod pet;
mod vaccine;
mod vaccine_record;
mod vaccine_stock;
mod veterinarian;

pub use code::CodeForm;
pub use owner::OwnerForm;
pub use pet::PetForm;
pub use vaccine::VaccineForm;
pub use vaccine_record::VaccineRecordForm;
pub use vaccine_stock::VaccineStockForm;
pub use veterinarian::VeterinarianForm;

use crate::api::{ApiError, CachedClient, Resource};
use crate::query::{Mutation, MutationState, Query};
use crate::ui::components::{Choice, Field, Form, FormEvent, KeyResult};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use futures::future::BoxFuture;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

type Entity<S> = <<S as FormSpec>::R as Resource>::Entity;
type Id<S> = <<S as FormSpec>::R as Resource>::Id;

pub trait FormSpec: Send + Sized + 'static {
  type R: Resource;

  fn fields() -> Vec<Field>;

  /// Per-form state, typically option lookups started here.
  fn open(client: &CachedClient) -> Self;

  /// Copy a fetched entity into the fields.
  fn fill(&mut self, form: &mut Form, entity: &Entity<Self>);

  /// Poll lookups and push their options into the form.
  fn tick(&mut self, _form: &mut Form) {}

  /// A select field changed.
  fn changed(&mut self, _form: &mut Form, _key: &'static str) {}

  /// Checks spanning several fields, run after the field rules pass.
  fn check(_form: &mut Form) -> bool {
    true
  }

  /// The write for this form: create when `editing` is `None`.
  fn submit(
    client: CachedClient,
    form: &Form,
    editing: Option<&Entity<Self>>,
  ) -> BoxFuture<'static, Result<(), ApiError>>;
}

/// Start a query and return it, for lookups opened with a form.
pub(crate) fn lookup<T, F, Fut>(fetcher: F) -> Query<T>
where
  T: Send + 'static,
  F: Fn() -> Fut + Send + Sync + 'static,
  Fut: std::future::Future<Output = Result<T, String>> + Send + 'static,
{
  let mut query = Query::new(fetcher);
  query.fetch();
  query
}

/// Poll `query`; when new data arrived, turn it into choices for `key`.
pub(crate) fn sync_choices<T>(
  query: &mut Query<Vec<T>>,
  form: &mut Form,
  key: &str,
  to_choice: impl Fn(&T) -> Choice,
) where
  T: Send + 'static,
{
  if query.poll() {
    let choices = query
      .data()
      .map(|rows| rows.iter().map(&to_choice).collect())
      .unwrap_or_default();
    form.set_choices(key, choices);
  }
}

pub struct EntityForm<S: FormSpec> {
  client: CachedClient,
  spec: S,
  form: Form,
  editing: Option<Entity<S>>,
  loading: Option<Query<Entity<S>>>,
  mutation: Mutation<()>,
}

impl<S: FormSpec> EntityForm<S> {
  pub fn create(client: &CachedClient) -> Self {
    Self {
      client: client.clone(),
      spec: S::open(client),
      form: Form::new(format!("New {}", S::R::NAME), S::fields()),
      editing: None,
      loading: None,
      mutation: Mutation::new(),
    }
  }

  /// Edit form; fields fill once the entity is fetched.
  pub fn edit(client: &CachedClient, id: Id<S>) -> Self {
    let fetch_client = client.clone();
    let loading = lookup(move || {
      let client = fetch_client.clone();
      let id = id.clone();
      async move { client.get::<S::R>(&id).await.map_err(|e| e.user_message()) }
    });

    Self {
      loading: Some(loading),
      form: Form::new(format!("Edit {}", S::R::NAME), S::fields()),
      ..Self::create(client)
    }
  }

  pub fn form(&self) -> &Form {
    &self.form
  }

  pub fn form_mut(&mut self) -> &mut Form {
    &mut self.form
  }

  pub fn is_submitting(&self) -> bool {
    self.mutation.is_pending()
  }

  fn verb(&self) -> &'static str {
    if self.editing.is_some() {
      "update"
    } else {
      "create"
    }
  }

  fn submit(&mut self) {
    if !S::check(&mut self.form) {
      return;
    }
    let write = S::submit(self.client.clone(), &self.form, self.editing.as_ref());
    let fallback = format!("Failed to {} {}. Please try again.", self.verb(), S::R::NAME);
    self
      .mutation
      .mutate(async move { write.await.map_err(|e| e.message_or(&fallback)) });
    self.form.set_busy(true);
  }
}

impl<S: FormSpec> View for EntityForm<S> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.editing.is_none() && self.loading.is_some() {
      return match key.code {
        KeyCode::Esc | KeyCode::Char('q') => ViewAction::Pop,
        _ => ViewAction::None,
      };
    }

    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submit) => self.submit(),
      KeyResult::Event(FormEvent::Cancel) => return ViewAction::Pop,
      KeyResult::Event(FormEvent::Changed(field)) => self.spec.changed(&mut self.form, field),
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    if let Some(loading) = &self.loading {
      let block = Block::default()
        .title(format!(" Edit {} ", S::R::NAME))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
      let paragraph = match loading.error() {
        Some(e) => Paragraph::new(format!("Error: {}\n\nPress Esc to go back.", e))
          .style(Style::default().fg(Color::Red)),
        None => Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray)),
      };
      frame.render_widget(paragraph.block(block), area);
      return;
    }
    self.form.render(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    if self.loading.is_some() || self.editing.is_some() {
      format!("Edit {}", S::R::NAME)
    } else {
      format!("New {}", S::R::NAME)
    }
  }

  fn tick(&mut self) -> ViewAction {
    if let Some(loading) = &mut self.loading {
      if loading.poll() {
        if let Some(entity) = loading.data().cloned() {
          self.spec.fill(&mut self.form, &entity);
          self.editing = Some(entity);
          self.loading = None;
        }
      }
    }

    self.spec.tick(&mut self.form);

    if self.mutation.poll() {
      self.form.set_busy(false);
      match self.mutation.state() {
        MutationState::Success(()) => {
          let verb = if self.editing.is_some() { "Updated" } else { "Created" };
          self.mutation.reset();
          return ViewAction::Finish(format!("{} {}", verb, S::R::NAME));
        }
        MutationState::Error(message) => self.form.set_message(Some(message.clone())),
        _ => {}
      }
    }
    ViewAction::None
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field").with_priority(10),
      ShortcutInfo::new("←/→", "choose").with_priority(20),
      ShortcutInfo::new("enter", "save").with_priority(30),
      ShortcutInfo::new("esc", "cancel").with_priority(90),
    ]
  }
}
