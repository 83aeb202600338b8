//! The `AttendanceStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! Higher layers (`rollcall-api`, `rollcall-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc, Weekday};
use uuid::Uuid;

use crate::{
  attendance::{AttendanceRecord, NewMark},
  lecture::{Lecture, LectureStatus, NewLecture},
  student::{NewStudent, Student},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`AttendanceStore::list_lectures`]. Unset fields do not
/// filter.
#[derive(Debug, Clone, Default)]
pub struct LectureQuery {
  /// Matches lectures taught by this teacher, either as the scheduled teacher
  /// or as the assigned substitute.
  pub teacher_id: Option<Uuid>,
  pub class_year: Option<String>,
  pub division:   Option<String>,
  /// Weekly lectures on this day, and one-off lectures dated on it.
  pub day:        Option<Weekday>,
}

/// Parameters for [`AttendanceStore::list_students`].
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
  pub class_year: Option<String>,
  pub division:   Option<String>,
}

impl StudentQuery {
  /// Exactly the students of one class and division.
  pub fn class(class_year: impl Into<String>, division: impl Into<String>) -> Self {
    Self {
      class_year: Some(class_year.into()),
      division:   Some(division.into()),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rollcall storage backend.
///
/// Attendance writes are upserts scoped to an occurrence window: a second
/// mark for the same (lecture, student) inside the window overwrites the
/// first instead of adding a row.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lectures ──────────────────────────────────────────────────────────

  /// Persist a new lecture with a `Scheduled` status hint.
  fn add_lecture(
    &self,
    input: NewLecture,
  ) -> impl Future<Output = Result<Lecture, Self::Error>> + Send + '_;

  /// Retrieve a lecture by id. Returns `None` if not found.
  fn get_lecture(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lecture>, Self::Error>> + Send + '_;

  /// List lectures matching `query`, ordered by day then start time.
  fn list_lectures<'a>(
    &'a self,
    query: &'a LectureQuery,
  ) -> impl Future<Output = Result<Vec<Lecture>, Self::Error>> + Send + 'a;

  /// Overwrite the persisted status hint. Returns `None` if the lecture does
  /// not exist.
  fn set_status_hint(
    &self,
    id: Uuid,
    status: LectureStatus,
  ) -> impl Future<Output = Result<Option<Lecture>, Self::Error>> + Send + '_;

  /// Assign (or clear, with `None`) the substitute teacher. Returns `None` if
  /// the lecture does not exist.
  fn assign_substitute(
    &self,
    id: Uuid,
    substitute_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<Lecture>, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  fn add_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// List students matching `query`, ordered by name then id.
  fn list_students<'a>(
    &'a self,
    query: &'a StudentQuery,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + 'a;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Record a mark. If a row for the same (lecture, student) exists with
  /// `created_at >= window_start` it is overwritten; otherwise a new row is
  /// inserted. `window_start = None` means the whole history is one window.
  ///
  /// Also sets the lecture's status hint to `Completed`.
  fn mark(
    &self,
    input: NewMark,
    window_start: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  /// All rows for `lecture_id` with `created_at >= since` (all rows when
  /// `since` is `None`).
  fn attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  /// Whether [`AttendanceStore::attendance_since`] would return anything.
  fn has_attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Bulk reset: delete every attendance row of the lecture and set its
  /// status hint back to `Scheduled`. Returns the number of rows removed.
  fn reset_attendance(
    &self,
    lecture_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
