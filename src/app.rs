use crate::api::CachedClient;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::models::Session;
use crate::notifications;
use crate::session::SessionStore;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{self, LoginView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::collections::VecDeque;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const FLASH_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` prompt
  command_input: CommandInput,

  client: CachedClient,
  sessions: SessionStore,
  session: Option<Session>,
  config: Config,

  /// Server notifications waiting to be dismissed, oldest first
  alerts: VecDeque<String>,

  /// Footer message and when it was set
  flash: Option<(String, Instant)>,

  /// Event sender for background producers, set once the loop runs
  event_tx: Option<mpsc::UnboundedSender<Event>>,
  notifications: Option<JoinHandle<()>>,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, client: CachedClient, sessions: SessionStore) -> Result<Self> {
    let session = sessions.load()?;
    client.set_token(session.as_ref().map(|s| s.token.clone()));

    let root: Box<dyn View> = match &session {
      Some(session) => {
        info!(user = %session.user.user_name, "restored session");
        views::home(&client)
      }
      None => Box::new(LoginView::new(&client)),
    };

    Ok(Self {
      view_stack: vec![root],
      command_input: CommandInput::new(),
      client,
      sessions,
      session,
      config,
      alerts: VecDeque::new(),
      flash: None,
      event_tx: None,
      notifications: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    self.stop_notifications();
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
  }

  async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);
    self.event_tx = Some(events.sender());
    self.start_notifications();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Notification(message) => {
        info!(text = %message, "notification queued");
        self.alerts.push_back(message);
      }
    }
  }

  fn tick(&mut self) {
    if let Some((_, at)) = &self.flash {
      if at.elapsed() >= FLASH_TTL {
        self.flash = None;
      }
    }
    if let Some(view) = self.view_stack.last_mut() {
      let action = view.tick();
      self.apply(action);
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // An alert blocks everything until dismissed
    if !self.alerts.is_empty() {
      if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        self.alerts.pop_front();
      }
      return;
    }

    match self.command_input.handle_key(key) {
      KeyResult::NotHandled => {}
      KeyResult::Handled => return,
      KeyResult::Event(CommandEvent::Run(name)) => {
        self.run_command(name);
        return;
      }
      KeyResult::Event(CommandEvent::Unknown(typed)) => {
        self.set_flash(format!("Unknown command: {}", typed));
        return;
      }
      KeyResult::Event(CommandEvent::Cancelled) => return,
    }

    let captures = self
      .view_stack
      .last()
      .map(|v| v.captures_input())
      .unwrap_or(false);
    if key.code == KeyCode::Char(':') && !captures && self.session.is_some() {
      self.command_input.activate();
      return;
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_key(key);
      self.apply(action);
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Flash(message) => self.set_flash(message),
      ViewAction::Finish(message) => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        }
        self.set_flash(message);
      }
      ViewAction::SignedIn(session) => self.sign_in(session),
    }
  }

  fn run_command(&mut self, name: &str) {
    match name {
      "quit" => self.should_quit = true,
      "logout" => self.logout(),
      _ => match views::root_view(name, &self.client) {
        Some(view) => self.view_stack = vec![view],
        None => self.set_flash(format!("Unknown command: {}", name)),
      },
    }
  }

  fn sign_in(&mut self, session: Session) {
    if let Err(e) = self.sessions.save(&session) {
      warn!(error = %e, "failed to persist session");
    }
    self.client.set_token(Some(session.token.clone()));
    self.client.clear_cache();
    self.set_flash(format!("Signed in as {}", session.user.user_name));
    self.session = Some(session);
    self.view_stack = vec![views::home(&self.client)];
    self.start_notifications();
  }

  fn logout(&mut self) {
    if let Err(e) = self.sessions.clear() {
      warn!(error = %e, "failed to clear stored session");
    }
    if let Some(session) = self.session.take() {
      info!(user = %session.user.user_name, "signed out");
    }
    self.stop_notifications();
    self.client.set_token(None);
    self.client.clear_cache();
    self.view_stack = vec![Box::new(LoginView::new(&self.client))];
    self.set_flash("Signed out".to_string());
  }

  fn start_notifications(&mut self) {
    if !self.config.notifications.enabled || self.session.is_none() || self.notifications.is_some()
    {
      return;
    }
    let Some(tx) = self.event_tx.clone() else {
      return;
    };
    self.notifications = Some(notifications::spawn(
      self.client.api().clone(),
      self.config.notifications.path.clone(),
      tx,
    ));
  }

  fn stop_notifications(&mut self) {
    if let Some(handle) = self.notifications.take() {
      handle.abort();
    }
  }

  fn set_flash(&mut self, message: String) {
    self.flash = Some((message, Instant::now()));
  }

  // Accessors for UI rendering

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn title(&self) -> &str {
    self.config.title.as_deref().unwrap_or("vaxvet")
  }

  pub fn api_url(&self) -> &str {
    self.config.base_url()
  }

  pub fn user_name(&self) -> Option<&str> {
    self.session.as_ref().map(|s| s.user.user_name.as_str())
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default()
  }

  /// The focused view is taking text
  pub fn input_active(&self) -> bool {
    self
      .view_stack
      .last()
      .map(|v| v.captures_input())
      .unwrap_or(false)
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }

  pub fn flash(&self) -> Option<&str> {
    self.flash.as_ref().map(|(message, _)| message.as_str())
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  /// Oldest undismissed notification and how many wait behind it
  pub fn alert(&self) -> Option<(&str, usize)> {
    self
      .alerts
      .front()
      .map(|message| (message.as_str(), self.alerts.len() - 1))
  }
}
