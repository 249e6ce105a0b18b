use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Blocking notification box; `pending` counts the alerts queued behind it.
pub fn draw_alert(frame: &mut Frame, area: Rect, message: &str, pending: usize) {
  let width = (area.width * 60 / 100).clamp(30, 70).min(area.width);
  let text_width = width.saturating_sub(4).max(1) as usize;
  let wrapped = message.chars().count().div_ceil(text_width) as u16;
  let height = (wrapped + 4).min(area.height);
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let overlay_area = Rect::new(x, y, width, height);

  frame.render_widget(Clear, overlay_area);

  let title = if pending > 0 {
    format!(" Notification (+{} more) ", pending)
  } else {
    " Notification ".to_string()
  };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Magenta))
    .title(title);

  let text = vec![
    Line::from(message.to_string()),
    Line::default(),
    Line::from(vec![
      Span::styled("<enter>", Style::default().fg(Color::Cyan)),
      Span::styled(" dismiss", Style::default().fg(Color::DarkGray)),
    ]),
  ];
  let paragraph = Paragraph::new(text)
    .block(block)
    .wrap(Wrap { trim: true });
  frame.render_widget(paragraph, overlay_area);
}
