//! Lectures: scheduled class sessions, either a recurring weekly slot or a
//! one-off dated session.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, student::Student};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Completion state of a lecture occurrence.
///
/// The value stored on a [`Lecture`] is only a hint; the status shown to
/// clients is always recomputed by [`crate::reconcile`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::AsRefStr,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LectureStatus {
  #[default]
  Scheduled,
  Completed,
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// When a lecture takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
  /// A recurring slot that repeats every week on `day`.
  Weekly { day: Weekday },
  /// A single session on a calendar date.
  Once { date: NaiveDate },
}

impl Schedule {
  pub fn is_recurring(&self) -> bool { matches!(self, Self::Weekly { .. }) }

  /// The weekday this lecture falls on.
  pub fn weekday(&self) -> Weekday {
    match self {
      Self::Weekly { day } => *day,
      Self::Once { date } => date.weekday(),
    }
  }
}

// ─── Lecture ─────────────────────────────────────────────────────────────────

/// Canonical form of a class-year or division label: trimmed, ASCII
/// uppercase. Stored labels are always in this form.
pub fn normalize_label(label: &str) -> String { label.trim().to_ascii_uppercase() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
  pub lecture_id:     Uuid,
  pub subject:        String,
  pub syllabus_topic: Option<String>,
  /// Class/year label, e.g. `"TY"`.
  pub class_year:     String,
  /// Division label, e.g. `"A"`.
  pub division:       String,
  pub schedule:       Schedule,
  pub start_time:     NaiveTime,
  pub end_time:       NaiveTime,
  pub teacher_id:     Uuid,
  pub substitute_id:  Option<Uuid>,
  /// Persisted status. Written on mark and reset, never trusted on read.
  pub status_hint:    LectureStatus,
  pub created_at:     DateTime<Utc>,
}

impl Lecture {
  /// `"<class_year>-<division>"`, e.g. `"TY-A"`.
  pub fn class_label(&self) -> String {
    format!("{}-{}", self.class_year, self.division)
  }

  /// The teacher actually taking the lecture: the substitute if one is
  /// assigned, otherwise the scheduled teacher.
  pub fn acting_teacher(&self) -> Uuid {
    self.substitute_id.unwrap_or(self.teacher_id)
  }

  /// Whether `student` belongs to this lecture's class and division.
  ///
  /// Compares stored labels exactly; both sides are normalised on create.
  pub fn enrolls(&self, student: &Student) -> bool {
    student.class_year == self.class_year && student.division == self.division
  }

  /// Validate a caller-supplied class label against this lecture.
  ///
  /// Accepts either `"<class_year>"` or `"<class_year>-<division>"`,
  /// compared case-insensitively.
  pub fn check_label(&self, label: &str) -> Result<()> {
    let label = label.trim();
    let matches = match label.split_once('-') {
      Some((year, division)) => {
        year.eq_ignore_ascii_case(&self.class_year)
          && division.eq_ignore_ascii_case(&self.division)
      }
      None => label.eq_ignore_ascii_case(&self.class_year),
    };

    if matches {
      Ok(())
    } else {
      Err(Error::ClassMismatch {
        label:    label.to_owned(),
        expected: self.class_label(),
      })
    }
  }

  /// Reject `student` unless [`Lecture::enrolls`] holds.
  pub fn check_enrolled(&self, student: &Student) -> Result<()> {
    if self.enrolls(student) {
      Ok(())
    } else {
      Err(Error::NotEnrolled {
        student_id: student.student_id,
        lecture_id: self.lecture_id,
      })
    }
  }
}

// ─── NewLecture ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::AttendanceStore::add_lecture`].
/// Identifier, status hint and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLecture {
  pub subject:        String,
  pub syllabus_topic: Option<String>,
  pub class_year:     String,
  pub division:       String,
  pub schedule:       Schedule,
  pub start_time:     NaiveTime,
  pub end_time:       NaiveTime,
  pub teacher_id:     Uuid,
}
