use crate::api::CachedClient;
use crate::models::{LoginRequest, Session};
use crate::query::{Mutation, MutationState};
use crate::ui::components::{Field, Form, FormEvent, KeyResult};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::register::RegisterView;
use crate::validation::Rule;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

/// Sign-in screen shown whenever there is no stored session.
pub struct LoginView {
  client: CachedClient,
  form: Form,
  login: Mutation<Session>,
}

impl LoginView {
  pub fn new(client: &CachedClient) -> Self {
    let fields = vec![
      Field::text("userName", "Username").rules(vec![Rule::Required("Username is required")]),
      Field::secret("password", "Password").rules(vec![Rule::Required("Password is required")]),
    ];
    Self {
      client: client.clone(),
      form: Form::new("Sign in", fields),
      login: Mutation::new(),
    }
  }

  pub fn form_mut(&mut self) -> &mut Form {
    &mut self.form
  }

  pub fn form(&self) -> &Form {
    &self.form
  }

  fn submit(&mut self) {
    let client = self.client.clone();
    let credentials = LoginRequest {
      user_name: self.form.value("userName").trim().to_string(),
      password: self.form.value("password").to_string(),
    };
    self.login.mutate(async move {
      client
        .login(&credentials)
        .await
        .map(Session::from)
        .map_err(|e| e.message_or("Login failed. Please check your credentials."))
    });
    self.form.set_busy(true);
  }
}

impl View for LoginView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
      return ViewAction::Push(Box::new(RegisterView::new(&self.client)));
    }
    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submit) => self.submit(),
      // Nowhere to go back to
      KeyResult::Event(FormEvent::Cancel) => self.form.clear(),
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
      Constraint::Fill(1),
      Constraint::Length(9),
      Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
      Constraint::Fill(1),
      Constraint::Length(60),
      Constraint::Fill(1),
    ])
    .areas(middle);
    self.form.render(frame, center);
  }

  fn breadcrumb_label(&self) -> String {
    "Sign in".to_string()
  }

  fn tick(&mut self) -> ViewAction {
    if !self.login.poll() {
      return ViewAction::None;
    }
    self.form.set_busy(false);
    if let Some(session) = self.login.take_success() {
      tracing::info!(user = %session.user.user_name, "signed in");
      return ViewAction::SignedIn(session);
    }
    if let MutationState::Error(message) = self.login.state() {
      tracing::warn!(error = %message, "sign in failed");
      self.form.set_message(Some(message.clone()));
      self.form.set_value("password", "");
    }
    ViewAction::None
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field").with_priority(10),
      ShortcutInfo::new("enter", "sign in").with_priority(20),
      ShortcutInfo::new("ctrl-r", "sign up").with_priority(30),
      ShortcutInfo::new("ctrl-c", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{tick_until, FakeBackend};

  fn enter() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
  }

  #[tokio::test]
  async fn test_good_credentials_sign_in() {
    let backend = FakeBackend::start().await;
    let mut view = LoginView::new(&backend.client());
    view.form_mut().set_value("userName", "mdemir");
    view.form_mut().set_value("password", "Secret1!");
    view.handle_key(enter());

    let action = tick_until(&mut view, |_| false).await;
    let ViewAction::SignedIn(session) = action else {
      panic!("expected sign in, got {:?}", action);
    };
    assert_eq!(session.token, "tok-123");
    assert_eq!(session.user.user_name, "mdemir");
  }

  #[tokio::test]
  async fn test_bad_credentials_show_server_message() {
    let backend = FakeBackend::start().await;
    let mut view = LoginView::new(&backend.client());
    view.form_mut().set_value("userName", "mdemir");
    view.form_mut().set_value("password", "wrong");
    view.handle_key(enter());

    tick_until(&mut view, |v| v.form().message().is_some()).await;
    assert_eq!(view.form().message(), Some("Invalid username or password"));
    assert_eq!(view.form().value("password"), "");
  }

  #[tokio::test]
  async fn test_blank_fields_do_not_call_api() {
    let backend = FakeBackend::start().await;
    let mut view = LoginView::new(&backend.client());
    view.handle_key(enter());
    assert_eq!(view.form().error("userName"), Some("Username is required"));
    assert_eq!(backend.total(), 0);
  }

  #[tokio::test]
  async fn test_ctrl_r_opens_sign_up() {
    let backend = FakeBackend::start().await;
    let mut view = LoginView::new(&backend.client());
    let action = view.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert!(matches!(action, ViewAction::Push(_)));
  }
}
