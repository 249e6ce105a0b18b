use crate::api::{CachedClient, Resource};
use crate::cache::EntityTag;
use crate::query::{Query, QueryState};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::list::ListSpec;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

type Entity<S> = <<S as ListSpec>::R as Resource>::Entity;
type Id<S> = <<S as ListSpec>::R as Resource>::Id;

/// Secondary list shown under an entity's fields, e.g. an owner's pets.
pub struct Related {
  pub title: &'static str,
  /// Refetch when this tag's generation moves
  pub tag: EntityTag,
  pub query: Query<Vec<String>>,
}

pub trait DetailSpec: ListSpec {
  fn fields(entity: &Entity<Self>) -> Vec<(&'static str, String)>;

  fn related(_client: &CachedClient, _id: &Id<Self>) -> Option<Related> {
    None
  }
}

/// Read-only page for one entity
pub struct DetailView<S: DetailSpec> {
  client: CachedClient,
  id: Id<S>,
  query: Query<Entity<S>>,
  related: Option<Related>,
  generations: (u64, u64),
}

impl<S: DetailSpec> DetailView<S> {
  pub fn new(client: &CachedClient, id: Id<S>) -> Self {
    let fetch_client = client.clone();
    let fetch_id = id.clone();
    let mut query = Query::new(move || {
      let client = fetch_client.clone();
      let id = fetch_id.clone();
      async move { client.get::<S::R>(&id).await.map_err(|e| e.user_message()) }
    });
    query.fetch();

    let mut related = S::related(client, &id);
    if let Some(related) = &mut related {
      related.query.fetch();
    }

    let mut view = Self {
      client: client.clone(),
      id,
      query,
      related,
      generations: (0, 0),
    };
    view.generations = view.current_generations();
    view
  }

  pub fn entity(&self) -> Option<&Entity<S>> {
    self.query.data()
  }

  pub fn related_rows(&self) -> &[String] {
    self
      .related
      .as_ref()
      .and_then(|r| r.query.data())
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  fn current_generations(&self) -> (u64, u64) {
    (
      self.client.generation(S::R::TAG),
      self
        .related
        .as_ref()
        .map(|r| self.client.generation(r.tag))
        .unwrap_or(0),
    )
  }

  fn refetch(&mut self) {
    self.query.refetch();
    if let Some(related) = &mut self.related {
      related.query.refetch();
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let name = S::R::NAME;
    let title = match self.query.state() {
      QueryState::Loading | QueryState::Idle => format!(" {} {} (loading...) ", name, self.id),
      QueryState::Error(e) => format!(" {} {} (error: {}) ", name, self.id, e),
      QueryState::Success(entity) => format!(" {} ", S::describe(entity)),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = self.query.error() {
      let paragraph = Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }
    let Some(entity) = self.query.data() else {
      let paragraph = Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    };

    let mut lines: Vec<Line> = S::fields(entity)
      .into_iter()
      .map(|(label, value)| {
        Line::from(vec![
          Span::styled(format!("{:>20}  ", label), Style::default().fg(Color::DarkGray)),
          Span::raw(value),
        ])
      })
      .collect();

    if let Some(related) = &self.related {
      lines.push(Line::default());
      let heading = match related.query.state() {
        QueryState::Loading | QueryState::Idle => format!("{} (loading...)", related.title),
        QueryState::Error(e) => format!("{} (error: {})", related.title, e),
        QueryState::Success(rows) => format!("{} ({})", related.title, rows.len()),
      };
      lines.push(Line::from(Span::styled(
        heading,
        Style::default().fg(Color::Cyan).bold(),
      )));
      lines.extend(
        self
          .related_rows()
          .iter()
          .map(|row| Line::from(format!("  {}", row))),
      );
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
  }
}

impl<S: DetailSpec> View for DetailView<S> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        self.client.refresh(S::R::TAG);
        if let Some(related) = &self.related {
          self.client.refresh(related.tag);
        }
      }
      KeyCode::Char('e') => {
        if let Some(entity) = self.query.data() {
          return ViewAction::Push(S::edit_view(&self.client, entity));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match self.query.data() {
      Some(entity) => S::describe(entity),
      None => format!("{} {}", S::R::NAME, self.id),
    }
  }

  fn tick(&mut self) -> ViewAction {
    self.query.poll();
    if let Some(related) = &mut self.related {
      related.query.poll();
    }

    let generations = self.current_generations();
    if generations != self.generations {
      self.generations = generations;
      self.refetch();
    }
    ViewAction::None
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("e", "edit").with_priority(30),
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
