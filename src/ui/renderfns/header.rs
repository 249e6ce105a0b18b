use crate::ui::view::{ShortcutInfo, ShortcutVisibility};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Header bar: title, API host, signed-in user and the view's shortcuts.
/// `WhenActive` shortcuts are listed only while the view takes input.
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  api_url: &str,
  user: Option<&str>,
  shortcuts: &[ShortcutInfo],
  input_active: bool,
) {
  let separator = Span::styled("│", Style::default().fg(Color::DarkGray));
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    separator.clone(),
    Span::styled(
      format!(" {} ", extract_domain(api_url)),
      Style::default().fg(Color::White),
    ),
    separator,
    match user {
      Some(name) => Span::styled(format!(" {} ", name), Style::default().fg(Color::Yellow).bold()),
      None => Span::styled(" signed out ", Style::default().fg(Color::DarkGray)),
    },
    Span::raw(" "),
  ];

  let mut visible: Vec<&ShortcutInfo> = shortcuts
    .iter()
    .filter(|s| input_active || s.visibility == ShortcutVisibility::Always)
    .collect();
  visible.sort_by_key(|s| s.priority);
  for shortcut in visible {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host part of the API base URL
pub fn extract_domain(url: &str) -> &str {
  let rest = url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url);
  rest.split('/').next().unwrap_or(rest)
}
