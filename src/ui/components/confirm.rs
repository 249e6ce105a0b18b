use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
  Confirmed,
  Cancelled,
}

/// Yes/no question drawn over the current view
#[derive(Debug, Clone, Default)]
pub struct ConfirmDialog {
  question: Option<String>,
}

impl ConfirmDialog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.question.is_some()
  }

  pub fn show(&mut self, question: impl Into<String>) {
    self.question = Some(question.into());
  }

  /// Swallows every key while open.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent> {
    if self.question.is_none() {
      return KeyResult::NotHandled;
    }
    let event = match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ConfirmEvent::Confirmed,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
        ConfirmEvent::Cancelled
      }
      _ => return KeyResult::Handled,
    };
    self.question = None;
    KeyResult::Event(event)
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(question) = &self.question else {
      return;
    };

    let width = (question.chars().count() as u16 + 6).clamp(30, area.width.max(30)).min(area.width);
    let height = 5.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(" Confirm ");

    let text = vec![
      Line::from(question.as_str()),
      Line::from(vec![
        Span::styled("<y>", Style::default().fg(Color::Cyan)),
        Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<n>", Style::default().fg(Color::Cyan)),
        Span::styled(" no", Style::default().fg(Color::DarkGray)),
      ]),
    ];
    let paragraph = Paragraph::new(text)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}
