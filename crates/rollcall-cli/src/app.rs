//! Application state machine and event dispatcher.
//!
//! Network calls run on spawned tasks and report back through an
//! [`Outcome`] channel, so marks appear on screen before the server answers.

use std::{sync::Arc, time::Duration};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use rollcall_core::{
  attendance::AttendanceStatus,
  roster::{Roster, RosterEntry},
};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::{
  client::{ApiClient, MarkAllSummary},
  session::{RosterSession, Tentative},
};

/// Upper bound on a roster fetch before the loading state is abandoned.
pub const ROSTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Completion of a background request.
#[derive(Debug)]
pub enum Outcome {
  Roster(Result<Roster, String>),
  Marked {
    change: Tentative,
    result: Result<(), String>,
  },
  MarkedAll {
    changes: Vec<Tentative>,
    result:  Result<MarkAllSummary, String>,
  },
  Reset(Result<usize, String>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub lecture_id:    Uuid,
  pub class_label:   String,
  pub session:       RosterSession,
  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter:        String,
  pub filter_active: bool,
  /// Cursor position within the *filtered* roster.
  pub cursor:        usize,
  /// One-line status message shown in the status bar.
  pub status_msg:    String,
  /// Defaults to [`ROSTER_TIMEOUT`].
  roster_timeout:    Duration,
  client:            Arc<ApiClient>,
  outcomes:          UnboundedSender<Outcome>,
}

impl App {
  pub fn new(
    client: ApiClient,
    lecture_id: Uuid,
    class_label: String,
    outcomes: UnboundedSender<Outcome>,
  ) -> Self {
    Self {
      lecture_id,
      class_label,
      session: RosterSession::default(),
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      status_msg: String::new(),
      roster_timeout: ROSTER_TIMEOUT,
      client: Arc::new(client),
      outcomes,
    }
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// Fetch the roster in the background, giving up after the roster timeout.
  pub fn request_roster(&mut self) {
    if self.session.loading {
      return;
    }
    self.session.begin_load();
    self.status_msg = "Loading roster…".into();

    let client = Arc::clone(&self.client);
    let tx = self.outcomes.clone();
    let (lecture_id, label) = (self.lecture_id, self.class_label.clone());
    let limit = self.roster_timeout;
    tokio::spawn(async move {
      let fetch = client.roster(lecture_id, &label);
      let result = match tokio::time::timeout(limit, fetch).await {
        Ok(Ok(roster)) => Ok(roster),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(_) => Err(format!(
          "roster request timed out after {}s",
          limit.as_secs()
        )),
      };
      tx.send(Outcome::Roster(result)).ok();
    });
  }

  fn request_mark(&mut self, student_id: Uuid, status: AttendanceStatus) {
    let Some(change) = self.session.apply(student_id, status) else {
      return;
    };

    let client = Arc::clone(&self.client);
    let tx = self.outcomes.clone();
    let lecture_id = self.lecture_id;
    tokio::spawn(async move {
      let result = client
        .mark(lecture_id, student_id, status)
        .await
        .map(|_| ())
        .map_err(|e| format!("{e:#}"));
      tx.send(Outcome::Marked { change, result }).ok();
    });
  }

  fn request_mark_all(&mut self) {
    let changes = self.session.apply_all();
    if changes.is_empty() {
      self.status_msg = "Nobody left to mark.".into();
      return;
    }

    let client = Arc::clone(&self.client);
    let tx = self.outcomes.clone();
    let (lecture_id, label) = (self.lecture_id, self.class_label.clone());
    tokio::spawn(async move {
      let result = client
        .mark_all(lecture_id, &label)
        .await
        .map_err(|e| format!("{e:#}"));
      tx.send(Outcome::MarkedAll { changes, result }).ok();
    });
  }

  fn request_reset(&mut self) {
    let client = Arc::clone(&self.client);
    let tx = self.outcomes.clone();
    let lecture_id = self.lecture_id;
    tokio::spawn(async move {
      let result = client.reset(lecture_id).await.map_err(|e| format!("{e:#}"));
      tx.send(Outcome::Reset(result)).ok();
    });
  }

  // ── Outcomes ──────────────────────────────────────────────────────────────

  pub fn handle_outcome(&mut self, outcome: Outcome) {
    match outcome {
      Outcome::Roster(result) => match self.session.finish_load(result) {
        Ok(()) => {
          self.status_msg.clear();
          self.clamp_cursor();
        }
        Err(e) => self.status_msg = format!("Error: {e}"),
      },

      Outcome::Marked { change, result: Ok(()) } => self.session.confirm(&change),
      Outcome::Marked { change, result: Err(e) } => {
        tracing::warn!(student_id = %change.student_id, error = %e, "mark reverted");
        self.session.revert(&change);
        self.status_msg = format!("Mark failed: {e}");
      }

      Outcome::MarkedAll { changes, result: Ok(summary) } => {
        for change in &changes {
          if summary.failed.contains(&change.student_id) {
            self.session.revert(change);
          } else {
            self.session.confirm(change);
          }
        }
        self.status_msg = if summary.failed.is_empty() {
          format!("Marked {} present.", summary.marked)
        } else {
          format!(
            "Marked {} present; {} failed.",
            summary.marked,
            summary.failed.len()
          )
        };
        // Anyone the server marked that this view had not seen yet.
        self.request_roster();
      }
      Outcome::MarkedAll { changes, result: Err(e) } => {
        for change in &changes {
          self.session.revert(change);
        }
        self.status_msg = format!("Mark all failed: {e}");
      }

      Outcome::Reset(Ok(removed)) => {
        self.status_msg = format!("Reset: removed {removed} marks.");
        self.request_roster();
      }
      Outcome::Reset(Err(e)) => self.status_msg = format!("Reset failed: {e}"),
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Roster entries that match the current filter query.
  pub fn filtered(&self) -> Vec<&RosterEntry> {
    if self.filter.is_empty() {
      return self.session.entries.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .session
      .entries
      .iter()
      .filter(|e| matcher.fuzzy_match(&e.student.name, &self.filter).is_some())
      .collect()
  }

  fn cursor_student(&self) -> Option<Uuid> {
    self
      .filtered()
      .get(self.cursor)
      .map(|e| e.student.student_id)
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.filtered().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('p') | KeyCode::Enter => self.mark_cursor(AttendanceStatus::Present),
      KeyCode::Char('a') => self.mark_cursor(AttendanceStatus::Absent),
      KeyCode::Char('l') => self.mark_cursor(AttendanceStatus::Late),
      KeyCode::Char('A') => self.request_mark_all(),
      KeyCode::Char('r') => self.request_roster(),
      KeyCode::Char('X') => self.request_reset(),

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
      }

      _ => {}
    }
    true
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
  }

  fn mark_cursor(&mut self, status: AttendanceStatus) {
    if let Some(id) = self.cursor_student() {
      self.request_mark(id, status);
    }
  }
}
