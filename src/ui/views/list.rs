//! Table view shared by every entity.
//!
//! The view keeps two copies of the search criteria: the draft being edited
//! in the search panel and the active criteria the query was built from.
//! Applying copies draft into active and refetches; clearing resets both.
//! Blank criteria list through "get all" (see [`CachedClient::list`]).

use crate::api::{ApiError, CachedClient, Resource};
use crate::models::SearchCriteria;
use crate::query::{Mutation, MutationState, Query, QueryState};
use crate::ui::components::{ConfirmDialog, ConfirmEvent, Field, Form, FormEvent, KeyResult};
use crate::ui::renderfns::{cell, ensure_valid_selection};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use futures::future::BoxFuture;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

type Entity<S> = <<S as ListSpec>::R as Resource>::Entity;
type Id<S> = <<S as ListSpec>::R as Resource>::Id;
type Search<S> = <<S as ListSpec>::R as Resource>::Search;

/// A per-row write other than delete, e.g. toggling an account.
pub struct RowAction {
  /// Footer message on success
  pub done: String,
  pub run: BoxFuture<'static, Result<(), ApiError>>,
}

/// What a table of one entity looks like and what its rows open.
pub trait ListSpec: Send + 'static {
  type R: Resource;

  const TITLE: &'static str;
  /// Header and width of each column
  const COLUMNS: &'static [(&'static str, usize)];
  /// Header label of the `a` key, when the entity has a row action
  const ROW_ACTION: Option<&'static str> = None;
  const CAN_CREATE: bool = true;

  fn cells(entity: &Entity<Self>) -> Vec<String>;

  fn cell_style(_entity: &Entity<Self>, _column: usize) -> Style {
    Style::default()
  }

  fn search_fields() -> Vec<Field>;

  /// Criteria from the search panel; blank fields stay unset.
  fn criteria(form: &Form) -> Search<Self>;

  fn id(entity: &Entity<Self>) -> Id<Self>;

  /// Short name for messages, e.g. "owner Ali Kaya"
  fn describe(entity: &Entity<Self>) -> String;

  /// `None` when the API has no create endpoint for the entity
  fn create_view(client: &CachedClient) -> Option<Box<dyn View>>;

  fn edit_view(client: &CachedClient, entity: &Entity<Self>) -> Box<dyn View>;

  fn detail_view(_client: &CachedClient, _entity: &Entity<Self>) -> Option<Box<dyn View>> {
    None
  }

  fn row_action(_client: &CachedClient, _entity: &Entity<Self>) -> Option<RowAction> {
    None
  }
}

fn list_query<S: ListSpec>(client: &CachedClient, criteria: Search<S>) -> Query<Vec<Entity<S>>> {
  let client = client.clone();
  Query::new(move || {
    let client = client.clone();
    let criteria = criteria.clone();
    async move {
      client
        .list::<S::R>(Some(&criteria))
        .await
        .map_err(|e| e.user_message())
    }
  })
}

/// Poll a write, returning its message once it has finished either way.
fn finished(mutation: &mut Mutation<String>) -> Option<String> {
  if !mutation.poll() {
    return None;
  }
  let message = match mutation.state() {
    MutationState::Success(message) | MutationState::Error(message) => message.clone(),
    _ => return None,
  };
  mutation.reset();
  Some(message)
}

pub struct ListView<S: ListSpec> {
  client: CachedClient,
  query: Query<Vec<Entity<S>>>,
  /// Tag generation the current data was fetched under
  generation: u64,
  active: Search<S>,
  search: Form,
  search_open: bool,
  list_state: ListState,
  confirm: ConfirmDialog,
  pending_delete: Option<(Id<S>, String)>,
  delete: Mutation<String>,
  action: Mutation<String>,
}

impl<S: ListSpec> ListView<S> {
  pub fn new(client: &CachedClient) -> Self {
    let active: Search<S> = Default::default();
    let mut query = list_query::<S>(client, active.clone());
    query.fetch();

    Self {
      client: client.clone(),
      query,
      generation: client.generation(S::R::TAG),
      active,
      search: Form::new(format!("Search {}", S::TITLE), S::search_fields()),
      search_open: false,
      list_state: ListState::default(),
      confirm: ConfirmDialog::new(),
      pending_delete: None,
      delete: Mutation::new(),
      action: Mutation::new(),
    }
  }

  pub fn rows(&self) -> &[Entity<S>] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  pub fn is_loading(&self) -> bool {
    self.query.is_loading()
  }

  pub fn active_criteria(&self) -> &Search<S> {
    &self.active
  }

  pub fn search_form_mut(&mut self) -> &mut Form {
    &mut self.search
  }

  fn selected(&self) -> Option<&Entity<S>> {
    self.list_state.selected().and_then(|i| self.rows().get(i))
  }

  fn reload(&mut self) {
    self.query = list_query::<S>(&self.client, self.active.clone());
    self.query.fetch();
    self.list_state.select(None);
  }

  /// Copy the draft into the active criteria and refetch.
  pub fn apply_search(&mut self) {
    self.active = S::criteria(&self.search);
    self.search_open = false;
    self.reload();
  }

  /// Reset draft and active criteria.
  pub fn clear_search(&mut self) {
    self.search.clear();
    self.active = Default::default();
    self.reload();
  }

  fn start_delete(&mut self) {
    let Some((id, name)) = self.pending_delete.take() else {
      return;
    };
    let client = self.client.clone();
    self.delete.mutate(async move {
      match client.delete::<S::R>(&id).await {
        Ok(()) => Ok(format!("Deleted {}", name)),
        Err(e) => {
          let fallback = format!("Failed to delete {}. Please try again.", S::R::NAME);
          Err(e.message_or(&fallback))
        }
      }
    });
  }

  fn start_row_action(&mut self) {
    let Some(action) = self.selected().and_then(|e| S::row_action(&self.client, e)) else {
      return;
    };
    let RowAction { done, run } = action;
    self.action.mutate(async move {
      match run.await {
        Ok(()) => Ok(done),
        Err(e) => Err(e.message_or("Action failed. Please try again.")),
      }
    });
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.rows().len();
    ensure_valid_selection(&mut self.list_state, len);

    let filtered = if self.active.is_empty() { "" } else { " filtered" };
    let title = match self.query.state() {
      QueryState::Loading | QueryState::Idle => format!(" {} (loading...) ", S::TITLE),
      QueryState::Error(e) => format!(" {} (error: {}) ", S::TITLE, e),
      QueryState::Success(rows) => format!(" {} ({}{}) ", S::TITLE, rows.len(), filtered),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 && !self.is_loading() {
      let content = if self.query.is_error() {
        "Failed to load. Press 'r' to retry."
      } else if !self.active.is_empty() {
        "Nothing matches the search. Press 'c' to clear it."
      } else {
        "Nothing here yet."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(inner);

    let header: Vec<Span> = std::iter::once(Span::raw("  "))
      .chain(S::COLUMNS.iter().map(|(name, width)| {
        Span::styled(
          format!("{} ", cell(name, *width)),
          Style::default().fg(Color::DarkGray).bold(),
        )
      }))
      .collect();
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let items: Vec<ListItem> = self
      .rows()
      .iter()
      .map(|entity| {
        let spans: Vec<Span> = S::cells(entity)
          .iter()
          .zip(S::COLUMNS)
          .enumerate()
          .map(|(i, (value, (_, width)))| {
            Span::styled(format!("{} ", cell(value, *width)), S::cell_style(entity, i))
          })
          .collect();
        ListItem::new(Line::from(spans))
      })
      .collect();

    let list = List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
  }
}

impl<S: ListSpec> View for ListView<S> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.search_open {
      match self.search.handle_key(key) {
        KeyResult::Event(FormEvent::Submit) => self.apply_search(),
        KeyResult::Event(FormEvent::Cancel) => self.search_open = false,
        _ => {}
      }
      return ViewAction::None;
    }

    match self.confirm.handle_key(key) {
      KeyResult::NotHandled => {}
      KeyResult::Event(ConfirmEvent::Confirmed) => {
        self.start_delete();
        return ViewAction::None;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) => {
        self.pending_delete = None;
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.client.refresh(S::R::TAG),
      KeyCode::Char('/') => self.search_open = true,
      KeyCode::Char('c') => self.clear_search(),
      KeyCode::Char('n') => {
        if let Some(view) = S::create_view(&self.client) {
          return ViewAction::Push(view);
        }
      }
      KeyCode::Enter => {
        if let Some(entity) = self.selected() {
          let view = S::detail_view(&self.client, entity)
            .unwrap_or_else(|| S::edit_view(&self.client, entity));
          return ViewAction::Push(view);
        }
      }
      KeyCode::Char('e') => {
        if let Some(entity) = self.selected() {
          return ViewAction::Push(S::edit_view(&self.client, entity));
        }
      }
      KeyCode::Char('d') => {
        if let Some(entity) = self.selected() {
          let id = S::id(entity);
          let name = S::describe(entity);
          self.confirm.show(format!("Delete {}?", name));
          self.pending_delete = Some((id, name));
        }
      }
      KeyCode::Char('a') => self.start_row_action(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
    if self.search_open {
      self.search.render_popup(frame, area);
    }
    self.confirm.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    S::TITLE.to_string()
  }

  fn tick(&mut self) -> ViewAction {
    self.query.poll();

    let generation = self.client.generation(S::R::TAG);
    if generation != self.generation {
      self.generation = generation;
      self.query.refetch();
    }

    if let Some(message) = finished(&mut self.delete) {
      return ViewAction::Flash(message);
    }
    if let Some(message) = finished(&mut self.action) {
      return ViewAction::Flash(message);
    }
    ViewAction::None
  }

  fn captures_input(&self) -> bool {
    self.search_open
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("c", "clear").with_priority(21),
      ShortcutInfo::new("e", "edit").with_priority(31),
      ShortcutInfo::new("d", "delete").with_priority(32),
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
      ShortcutInfo::new("enter", "apply").with_priority(22).when_active(),
      ShortcutInfo::new("esc", "close").with_priority(23).when_active(),
    ];
    if S::CAN_CREATE {
      shortcuts.push(ShortcutInfo::new("n", "new").with_priority(30));
    }
    if let Some(label) = S::ROW_ACTION {
      shortcuts.push(ShortcutInfo::new("a", label).with_priority(33));
    }
    shortcuts
  }
}
