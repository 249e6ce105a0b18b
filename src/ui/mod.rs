pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use renderfns::{draw_alert, draw_footer, draw_header};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Breadcrumb and flash
    ])
    .split(frame.area());

  let shortcuts = app.shortcuts();
  draw_header(
    frame,
    chunks[0],
    app.title(),
    app.api_url(),
    app.user_name(),
    &shortcuts,
    app.input_active(),
  );

  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1]);
  }

  draw_footer(frame, chunks[2], &app.breadcrumb(), app.flash());

  app.command_input().render_overlay(frame, chunks[1]);
  if let Some((message, pending)) = app.alert() {
    draw_alert(frame, frame.area(), message, pending);
  }
}
