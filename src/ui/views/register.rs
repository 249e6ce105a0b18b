use crate::api::CachedClient;
use crate::models::{non_empty, RegisterRequest};
use crate::query::{Mutation, MutationState};
use crate::ui::components::{Field, Form, FormEvent, KeyResult};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::validation::Rule;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

pub const REGISTERED: &str = "Registration successful! Please log in with your credentials.";

/// Veterinarian sign-up, reached from the sign-in screen.
pub struct RegisterView {
  client: CachedClient,
  form: Form,
  register: Mutation<()>,
}

impl RegisterView {
  pub fn new(client: &CachedClient) -> Self {
    let fields = vec![
      Field::text("userName", "Username").max_len(100).rules(vec![
        Rule::Required("Username is required"),
        Rule::MinLen(4, "Username must be at least 4 characters"),
        Rule::MaxLen(100, "Username must not exceed 100 characters"),
      ]),
      Field::text("firstName", "First name").rules(vec![
        Rule::Required("First name is required"),
        Rule::MinLen(2, "First name must be at least 2 characters"),
      ]),
      Field::text("lastName", "Last name").rules(vec![
        Rule::Required("Last name is required"),
        Rule::MinLen(2, "Last name must be at least 2 characters"),
      ]),
      Field::text("licenseNumber", "License number"),
      Field::secret("password", "Password").rules(vec![
        Rule::Required("Password is required"),
        Rule::MinLen(8, "Password must be at least 8 characters"),
        Rule::Password("Password must contain uppercase, lowercase, number and special character"),
      ]),
      Field::secret("confirmPassword", "Confirm password")
        .rules(vec![Rule::Required("Please confirm your password")]),
    ];
    Self {
      client: client.clone(),
      form: Form::new("Sign up", fields),
      register: Mutation::new(),
    }
  }

  pub fn form(&self) -> &Form {
    &self.form
  }

  pub fn form_mut(&mut self) -> &mut Form {
    &mut self.form
  }

  fn submit(&mut self) {
    if self.form.value("password") != self.form.value("confirmPassword") {
      self.form.set_error("confirmPassword", "Passwords do not match");
      return;
    }
    let client = self.client.clone();
    let request = RegisterRequest {
      user_name: self.form.value("userName").trim().to_string(),
      password: self.form.value("password").to_string(),
      first_name: self.form.value("firstName").trim().to_string(),
      last_name: self.form.value("lastName").trim().to_string(),
      license_number: non_empty(self.form.value("licenseNumber")),
    };
    self.register.mutate(async move {
      client
        .register(&request)
        .await
        .map_err(|e| e.message_or("Registration failed. Please try again."))
    });
    self.form.set_busy(true);
  }
}

impl View for RegisterView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submit) => self.submit(),
      KeyResult::Event(FormEvent::Cancel) => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [_, center, _] = Layout::horizontal([
      Constraint::Fill(1),
      Constraint::Length(72),
      Constraint::Fill(1),
    ])
    .areas(area);
    self.form.render(frame, center);
  }

  fn breadcrumb_label(&self) -> String {
    "Sign up".to_string()
  }

  fn tick(&mut self) -> ViewAction {
    if !self.register.poll() {
      return ViewAction::None;
    }
    self.form.set_busy(false);
    match self.register.state() {
      MutationState::Success(()) => {
        tracing::info!(user = self.form.value("userName"), "registered");
        ViewAction::Finish(REGISTERED.to_string())
      }
      MutationState::Error(message) => {
        self.form.set_message(Some(message.clone()));
        ViewAction::None
      }
      _ => ViewAction::None,
    }
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field").with_priority(10),
      ShortcutInfo::new("enter", "sign up").with_priority(20),
      ShortcutInfo::new("esc", "back").with_priority(90),
    ]
  }
}
