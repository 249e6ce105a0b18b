use crate::models::Session;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// When a shortcut should be shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortcutVisibility {
  #[default]
  Always,
  /// Listed only while the view is in a mode that uses it
  WhenActive,
}

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub visibility: ShortcutVisibility,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      visibility: ShortcutVisibility::Always,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }

  pub const fn when_active(mut self) -> Self {
    self.visibility = ShortcutVisibility::WhenActive;
    self
  }
}

/// Actions that a view can request from the App
pub enum ViewAction {
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
  /// Show a message in the footer
  Flash(String),
  /// Pop back to the previous view and show a message
  Finish(String),
  /// Credentials accepted; the App stores the session and opens the home view
  SignedIn(Session),
}

impl std::fmt::Debug for ViewAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ViewAction::None => write!(f, "None"),
      ViewAction::Push(view) => write!(f, "Push({})", view.breadcrumb_label()),
      ViewAction::Pop => write!(f, "Pop"),
      ViewAction::Flash(message) => write!(f, "Flash({:?})", message),
      ViewAction::Finish(message) => write!(f, "Finish({:?})", message),
      ViewAction::SignedIn(session) => write!(f, "SignedIn({})", session.user.user_name),
    }
  }
}

/// Trait for view behavior
///
/// Views handle their own input modes (search panel, confirm dialog, form
/// fields) and return actions for the App to execute. Views that load data
/// use `Query<T>`/`Mutation<T>` internally and poll them in `tick()`.
pub trait View: Send {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Called on every tick to poll pending reads and writes
  fn tick(&mut self) -> ViewAction {
    ViewAction::None
  }

  /// True while the view is taking text, so `:` and `q` go to it
  fn captures_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
