//! TUI rendering.

pub mod roster;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};
use rollcall_core::{lecture::LectureStatus, roster::RosterStatus};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // roster
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  roster::draw(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%a %Y-%m-%d").to_string();

  let title = match &app.session.lecture {
    Some(meta) => {
      let topic = meta
        .syllabus_topic
        .as_deref()
        .map(|t| format!(" · {t}"))
        .unwrap_or_default();
      format!(" {} {}-{}{topic}", meta.subject, meta.class_year, meta.division)
    }
    None => format!(" {}", app.class_label),
  };

  let badge = match app.session.lecture.as_ref().map(|m| m.status) {
    Some(LectureStatus::Completed) => Span::styled(
      " COMPLETED ",
      Style::default().fg(Color::Black).bg(Color::Green),
    ),
    Some(LectureStatus::Scheduled) => Span::styled(
      " SCHEDULED ",
      Style::default().fg(Color::Black).bg(Color::Yellow),
    ),
    None => Span::raw(""),
  };

  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let used = left.content.chars().count() + badge.content.len() + right.content.len() + 1;
  let pad = (area.width as usize).saturating_sub(used);

  let line = Line::from(vec![
    left,
    Span::raw(" "),
    badge,
    Span::raw(" ".repeat(pad)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.filter_active {
    ("SEARCH", "Type to filter  Esc cancel  Enter keep".to_string())
  } else {
    let s = &app.session;
    (
      "ROLL",
      format!(
        "P{} A{} L{} ?{}  p/a/l mark  A all  r reload  / search  q quit",
        s.count(RosterStatus::Present),
        s.count(RosterStatus::Absent),
        s.count(RosterStatus::Late),
        s.count(RosterStatus::Pending),
      ),
    )
  };

  let status = if app.status_msg.is_empty() {
    hints
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
