use crate::models::DueStatus;
use ratatui::prelude::Color;
use ratatui::widgets::ListState;

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Truncate and left-align into a fixed-width column
pub fn cell(s: &str, width: usize) -> String {
  format!("{:<width$}", truncate(s, width), width = width)
}

pub fn due_status_color(status: DueStatus) -> Color {
  match status {
    DueStatus::Overdue => Color::Red,
    DueStatus::DueSoon => Color::Yellow,
    DueStatus::UpToDate => Color::Green,
    DueStatus::NoFollowUp => Color::DarkGray,
  }
}

/// Keep the selection inside a list of `len` rows.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  match state.selected() {
    _ if len == 0 => state.select(None),
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("Pamuk", 10), "Pamuk");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("Pamuk", 5), "Pamuk");
  }

  #[test]
  fn test_truncate_counts_characters() {
    assert_eq!(truncate("Çağrı Öztürk", 8), "Çağrı...");
  }

  #[test]
  fn test_cell_pads() {
    assert_eq!(cell("Van", 6), "Van   ");
    assert_eq!(cell("Ayşe", 5).chars().count(), 5);
  }

  #[test]
  fn test_due_status_color() {
    assert_eq!(due_status_color(DueStatus::Overdue), Color::Red);
    assert_eq!(due_status_color(DueStatus::DueSoon), Color::Yellow);
    assert_eq!(due_status_color(DueStatus::UpToDate), Color::Green);
    assert_eq!(due_status_color(DueStatus::NoFollowUp), Color::DarkGray);
  }

  #[test]
  fn test_ensure_valid_selection() {
    let mut state = ListState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));
    state.select(Some(5));
    ensure_valid_selection(&mut state, 2);
    assert_eq!(state.selected(), Some(1));
    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }
}
