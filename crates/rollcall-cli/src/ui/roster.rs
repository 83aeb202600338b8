//! Roster pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use rollcall_core::roster::{RosterEntry, RosterStatus};

use crate::app::App;

fn status_style(status: RosterStatus) -> Style {
  match status {
    RosterStatus::Present => Style::default().fg(Color::Green),
    RosterStatus::Absent => Style::default().fg(Color::Red),
    RosterStatus::Late => Style::default().fg(Color::Yellow),
    RosterStatus::Pending => Style::default().fg(Color::DarkGray),
  }
}

fn risk_span(entry: &RosterEntry) -> Span<'static> {
  match &entry.risk {
    Some(r) if r.risk_score >= 0.7 => Span::styled(
      format!(" risk {:.0}%", r.risk_score * 100.0),
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ),
    Some(r) => Span::styled(
      format!(" risk {:.0}%", r.risk_score * 100.0),
      Style::default().fg(Color::DarkGray),
    ),
    None => Span::raw(""),
  }
}

/// Render the roster into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered();
  let total = app.session.entries.len();

  let title = if app.session.loading {
    " Roster (loading…) ".to_string()
  } else if app.filter_active || !app.filter.is_empty() {
    format!(" Roster ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Roster ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let width = filtered
    .iter()
    .map(|e| e.student.name.chars().count())
    .max()
    .unwrap_or(0);

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entry| {
      let marker = if app.session.is_in_flight(entry.student.student_id) {
        "… "
      } else {
        "  "
      };
      ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::raw(format!("{:<width$}  ", entry.student.name)),
        Span::styled(format!("{:<8}", entry.status.to_string()), status_style(entry.status)),
        risk_span(entry),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select(if filtered.is_empty() { None } else { Some(app.cursor) });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
