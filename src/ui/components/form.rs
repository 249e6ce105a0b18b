//! Field-bound form state shared by every create/edit view and search panel.
//!
//! A form is a column of fields. Text fields edit through [`TextInput`],
//! select fields cycle through a list of choices with Left/Right. Enter runs
//! every field's rules and only emits [`FormEvent::Submit`] when all pass.

use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::validation::{validate, Rule};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub value: String,
  pub label: String,
}

impl Choice {
  pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
    Self {
      value: value.to_string(),
      label: label.into(),
    }
  }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
  Text,
  /// Text rendered as `*`
  Secret,
  Select {
    choices: Vec<Choice>,
    selected: Option<usize>,
    enabled: bool,
    placeholder: &'static str,
    /// Value requested before its choice was loaded
    wanted: Option<String>,
  },
}

#[derive(Debug, Clone)]
pub struct Field {
  key: &'static str,
  label: &'static str,
  kind: FieldKind,
  input: TextInput,
  rules: Vec<Rule>,
  error: Option<String>,
}

impl Field {
  fn with_kind(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
    Self {
      key,
      label,
      kind,
      input: TextInput::new(),
      rules: Vec::new(),
      error: None,
    }
  }

  pub fn text(key: &'static str, label: &'static str) -> Self {
    Self::with_kind(key, label, FieldKind::Text)
  }

  pub fn secret(key: &'static str, label: &'static str) -> Self {
    Self::with_kind(key, label, FieldKind::Secret)
  }

  pub fn select(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
    Self::with_kind(
      key,
      label,
      FieldKind::Select {
        choices: Vec::new(),
        selected: None,
        enabled: true,
        placeholder,
        wanted: None,
      },
    )
  }

  pub fn rules(mut self, rules: Vec<Rule>) -> Self {
    self.rules = rules;
    self
  }

  pub fn max_len(mut self, max_len: usize) -> Self {
    self.input = self.input.with_max_len(max_len);
    self
  }

  /// Fixed choices, e.g. gender or code type.
  pub fn choices(mut self, new: Vec<Choice>) -> Self {
    if let FieldKind::Select { choices, .. } = &mut self.kind {
      *choices = new;
    }
    self
  }

  /// Select that starts greyed out until another field enables it.
  pub fn disabled(mut self) -> Self {
    if let FieldKind::Select { enabled, .. } = &mut self.kind {
      *enabled = false;
    }
    self
  }

  pub fn value(&self) -> &str {
    match &self.kind {
      FieldKind::Select {
        choices, selected, ..
      } => selected
        .and_then(|i| choices.get(i))
        .map(|c| c.value.as_str())
        .unwrap_or(""),
      _ => self.input.value(),
    }
  }

  fn display(&self, focused: bool) -> Vec<Span<'_>> {
    let dim = Style::default().fg(Color::DarkGray);
    match &self.kind {
      FieldKind::Select {
        choices,
        selected,
        enabled,
        placeholder,
        ..
      } => {
        let label = selected
          .and_then(|i| choices.get(i))
          .map(|c| c.label.as_str());
        let style = match (enabled, label) {
          (false, _) => dim.add_modifier(Modifier::CROSSED_OUT),
          (true, None) => dim,
          (true, Some(_)) => Style::default(),
        };
        let text = label.unwrap_or(placeholder).to_string();
        if focused && *enabled {
          vec![
            Span::styled("< ", Style::default().fg(Color::Yellow)),
            Span::styled(text, style),
            Span::styled(" >", Style::default().fg(Color::Yellow)),
          ]
        } else {
          vec![Span::raw("  "), Span::styled(text, style)]
        }
      }
      FieldKind::Text | FieldKind::Secret => {
        let shown: String = match self.kind {
          FieldKind::Secret => "*".repeat(self.input.value().chars().count()),
          _ => self.input.value().to_string(),
        };
        if !focused {
          return vec![Span::raw("  "), Span::raw(shown)];
        }
        let cursor = self.input.cursor_position();
        let before: String = shown.chars().take(cursor).collect();
        let at: String = shown.chars().nth(cursor).map(String::from).unwrap_or(" ".into());
        let after: String = shown.chars().skip(cursor + 1).collect();
        vec![
          Span::raw("  "),
          Span::raw(before),
          Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
          Span::raw(after),
        ]
      }
    }
  }
}

/// Events emitted by a form that its view needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Enter with every field valid
  Submit,
  Cancel,
  /// A select field changed its selection
  Changed(&'static str),
}

#[derive(Debug, Clone)]
pub struct Form {
  title: String,
  fields: Vec<Field>,
  focus: usize,
  message: Option<String>,
  busy: bool,
}

impl Form {
  pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
    Self {
      title: title.into(),
      fields,
      focus: 0,
      message: None,
      busy: false,
    }
  }

  fn field(&self, key: &str) -> Option<&Field> {
    self.fields.iter().find(|f| f.key == key)
  }

  fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
    self.fields.iter_mut().find(|f| f.key == key)
  }

  pub fn value(&self, key: &str) -> &str {
    self.field(key).map(Field::value).unwrap_or("")
  }

  /// Set a text value, or select the choice whose value matches. A select
  /// value whose choice has not loaded yet is applied by `set_choices`.
  pub fn set_value(&mut self, key: &str, value: &str) {
    let Some(field) = self.field_mut(key) else {
      return;
    };
    match &mut field.kind {
      FieldKind::Select {
        choices,
        selected,
        wanted,
        ..
      } => {
        *selected = choices.iter().position(|c| c.value == value);
        *wanted = if selected.is_none() && !value.is_empty() {
          Some(value.to_string())
        } else {
          None
        };
      }
      _ => field.input.set_value(value),
    }
  }

  /// Replace a select's choices, keeping the current value when it survives.
  pub fn set_choices(&mut self, key: &str, new: Vec<Choice>) {
    let Some(field) = self.field_mut(key) else {
      return;
    };
    if let FieldKind::Select {
      choices,
      selected,
      wanted,
      ..
    } = &mut field.kind
    {
      let current = wanted.take().or_else(|| {
        selected
          .and_then(|i| choices.get(i))
          .map(|c| c.value.clone())
      });
      *choices = new;
      *selected = current.and_then(|v| choices.iter().position(|c| c.value == v));
    }
  }

  pub fn choices(&self, key: &str) -> &[Choice] {
    match self.field(key).map(|f| &f.kind) {
      Some(FieldKind::Select { choices, .. }) => choices,
      _ => &[],
    }
  }

  pub fn set_enabled(&mut self, key: &str, on: bool) {
    if let Some(FieldKind::Select { enabled, .. }) = self.field_mut(key).map(|f| &mut f.kind) {
      *enabled = on;
    }
  }

  pub fn is_enabled(&self, key: &str) -> bool {
    match self.field(key).map(|f| &f.kind) {
      Some(FieldKind::Select { enabled, .. }) => *enabled,
      Some(_) => true,
      None => false,
    }
  }

  pub fn error(&self, key: &str) -> Option<&str> {
    self.field(key).and_then(|f| f.error.as_deref())
  }

  pub fn set_error(&mut self, key: &str, error: impl Into<String>) {
    let index = self.fields.iter().position(|f| f.key == key);
    if let Some(index) = index {
      self.fields[index].error = Some(error.into());
      self.focus = index;
    }
  }

  /// Form-level message, e.g. the server's reason for rejecting a submit.
  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn set_message(&mut self, message: Option<String>) {
    self.message = message;
  }

  pub fn set_busy(&mut self, busy: bool) {
    self.busy = busy;
  }

  pub fn is_blank(&self) -> bool {
    self.fields.iter().all(|f| f.value().trim().is_empty())
  }

  /// Reset every field to blank.
  pub fn clear(&mut self) {
    for field in &mut self.fields {
      field.error = None;
      field.input.clear();
      if let FieldKind::Select {
        selected, wanted, ..
      } = &mut field.kind
      {
        *selected = None;
        *wanted = None;
      }
    }
    self.message = None;
    self.focus = 0;
  }

  /// Run every field's rules. Focus moves to the first failing field.
  pub fn validate(&mut self) -> bool {
    for field in &mut self.fields {
      field.error = validate(field.value(), &field.rules).map(String::from);
    }
    match self.fields.iter().position(|f| f.error.is_some()) {
      Some(index) => {
        self.focus = index;
        false
      }
      None => true,
    }
  }

  fn move_focus(&mut self, forward: bool) {
    let len = self.fields.len();
    if len == 0 {
      return;
    }
    self.focus = if forward {
      (self.focus + 1) % len
    } else {
      (self.focus + len - 1) % len
    };
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Esc => return KeyResult::Event(FormEvent::Cancel),
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(true);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(false);
        return KeyResult::Handled;
      }
      KeyCode::Enter => {
        if self.busy || !self.validate() {
          return KeyResult::Handled;
        }
        self.message = None;
        return KeyResult::Event(FormEvent::Submit);
      }
      _ => {}
    }

    let Some(field) = self.fields.get_mut(self.focus) else {
      return KeyResult::NotHandled;
    };
    let key_name = field.key;
    match &mut field.kind {
      FieldKind::Select {
        choices,
        selected,
        enabled,
        wanted,
        ..
      } => {
        let forward = match key.code {
          KeyCode::Right | KeyCode::Char(' ') => true,
          KeyCode::Left => false,
          _ => return KeyResult::Handled,
        };
        if !*enabled {
          return KeyResult::Handled;
        }
        // None sits between the last and first choice
        let len = choices.len();
        *selected = match (*selected, forward) {
          (None, true) if len > 0 => Some(0),
          (None, false) if len > 0 => Some(len - 1),
          (Some(i), true) if i + 1 < len => Some(i + 1),
          (Some(i), false) if i > 0 => Some(i - 1),
          _ => None,
        };
        *wanted = None;
        field.error = None;
        KeyResult::Event(FormEvent::Changed(key_name))
      }
      FieldKind::Text | FieldKind::Secret => match field.input.handle_key(key) {
        InputResult::Consumed => {
          field.error = None;
          KeyResult::Handled
        }
        _ => KeyResult::NotHandled,
      },
    }
  }

  fn lines(&self) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for (i, field) in self.fields.iter().enumerate() {
      let focused = i == self.focus;
      let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::DarkGray)
      };
      let mut spans = vec![Span::styled(
        format!("{:>width$}", field.label, width = LABEL_WIDTH),
        label_style,
      )];
      spans.extend(field.display(focused));
      lines.push(Line::from(spans));
      if let Some(error) = &field.error {
        lines.push(Line::from(Span::styled(
          format!("{:>width$}  {}", "", error, width = LABEL_WIDTH),
          Style::default().fg(Color::Red),
        )));
      }
    }

    lines.push(Line::default());
    if self.busy {
      lines.push(Line::from(Span::styled(
        "  Saving...",
        Style::default().fg(Color::Yellow),
      )));
    } else if let Some(message) = &self.message {
      lines.push(Line::from(Span::styled(
        format!("  {}", message),
        Style::default().fg(Color::Red),
      )));
    }
    lines
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.title))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(Paragraph::new(self.lines()).block(block), area);
  }

  /// Render as a box over the top of `area`, e.g. a list's search panel.
  pub fn render_popup(&self, frame: &mut Frame, area: Rect) {
    let height = (self.lines().len() as u16 + 2).min(area.height);
    let width = (area.width * 70 / 100).clamp(40, 80).min(area.width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup = Rect::new(x, area.y + 1, width, height).intersection(area);
    frame.render_widget(Clear, popup);
    self.render(frame, popup);
  }
}
