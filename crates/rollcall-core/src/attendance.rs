//! Attendance records: one student's mark on one lecture occurrence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::AsRefStr,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
  Present,
  Absent,
  Late,
}

/// A stored mark. At most one exists per (lecture, student) per occurrence
/// window; re-marking overwrites `status` and bumps `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub record_id:  Uuid,
  pub lecture_id: Uuid,
  pub student_id: Uuid,
  pub status:     AttendanceStatus,
  /// The acting user who recorded the latest mark.
  pub marked_by:  Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::mark`].
#[derive(Debug, Clone)]
pub struct NewMark {
  pub lecture_id: Uuid,
  pub student_id: Uuid,
  pub status:     AttendanceStatus,
  pub marked_by:  Uuid,
  /// Time of marking, taken from the caller's clock.
  pub at:         DateTime<Utc>,
}
