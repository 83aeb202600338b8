//! Read-time status reconciliation.
//!
//! The status stored on a lecture is only a hint: marking sets it to
//! `completed`, but nothing resets it when a recurring slot rolls into a new
//! week. The status shown to clients is always derived from attendance rows
//! inside the lecture's current occurrence window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lecture::{Lecture, LectureStatus, Schedule};

/// Lower bound on `created_at` for attendance rows that belong to the
/// lecture's current occurrence.
///
/// Weekly lectures are bounded by the start of the current week. One-off
/// lectures have a single occurrence, so every row counts (`None`).
pub fn occurrence_window(
  lecture: &Lecture,
  week_start: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
  match lecture.schedule {
    Schedule::Weekly { .. } => Some(week_start),
    Schedule::Once { .. } => None,
  }
}

/// `Completed` iff attendance exists in the occurrence window; the stored
/// hint is ignored.
pub fn effective_status(has_attendance_in_window: bool) -> LectureStatus {
  if has_attendance_in_window {
    LectureStatus::Completed
  } else {
    LectureStatus::Scheduled
  }
}

/// A lecture together with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureView {
  #[serde(flatten)]
  pub lecture: Lecture,
  /// Effective status for the current occurrence.
  pub status:  LectureStatus,
}

impl LectureView {
  pub fn new(lecture: Lecture, has_attendance_in_window: bool) -> Self {
    Self { lecture, status: effective_status(has_attendance_in_window) }
  }

  /// True when the stored hint disagrees with the derived status.
  pub fn is_stale(&self) -> bool { self.lecture.status_hint != self.status }
}
