//! Roster: the students expected in a lecture, each annotated with this
//! occurrence's attendance status.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  attendance::{AttendanceRecord, AttendanceStatus},
  lecture::LectureStatus,
  reconcile::LectureView,
  risk::{Prediction, Risk},
  student::Student,
};

/// Attendance status as displayed on a roster. `Pending` means no mark has
/// been recorded in the current occurrence window.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RosterStatus {
  Present,
  Absent,
  Late,
  Pending,
}

impl From<AttendanceStatus> for RosterStatus {
  fn from(s: AttendanceStatus) -> Self {
    match s {
      AttendanceStatus::Present => Self::Present,
      AttendanceStatus::Absent => Self::Absent,
      AttendanceStatus::Late => Self::Late,
    }
  }
}

impl RosterStatus {
  /// Whether "mark all present" should touch a student in this state.
  pub fn awaits_presence(self) -> bool { matches!(self, Self::Pending | Self::Absent) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
  #[serde(flatten)]
  pub student: Student,
  pub status:  RosterStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub risk:    Option<Risk>,
}

/// Lecture metadata returned alongside a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureMeta {
  pub lecture_id:     Uuid,
  pub subject:        String,
  pub syllabus_topic: Option<String>,
  pub class_year:     String,
  pub division:       String,
  /// Effective status for the current occurrence.
  pub status:         LectureStatus,
  pub week_start:     DateTime<Utc>,
}

impl LectureMeta {
  pub fn from_view(view: &LectureView, week_start: DateTime<Utc>) -> Self {
    let l = &view.lecture;
    Self {
      lecture_id: l.lecture_id,
      subject: l.subject.clone(),
      syllabus_topic: l.syllabus_topic.clone(),
      class_year: l.class_year.clone(),
      division: l.division.clone(),
      status: view.status,
      week_start,
    }
  }
}

/// Response body of `GET /attendance/roster/{lecture_id}/{class_label}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
  pub roster:  Vec<RosterEntry>,
  pub lecture: LectureMeta,
}

// ─── Merge ───────────────────────────────────────────────────────────────────

/// Attach a status to every student: the mark found in `records`, or
/// `Pending` when there is none. Student order is preserved.
///
/// `records` must already be restricted to the occurrence window. Should a
/// student have more than one row there, the most recently updated wins.
pub fn build_roster(
  students: Vec<Student>,
  records: &[AttendanceRecord],
) -> Vec<RosterEntry> {
  let mut latest: HashMap<Uuid, &AttendanceRecord> = HashMap::new();
  for r in records {
    latest
      .entry(r.student_id)
      .and_modify(|cur| {
        if r.updated_at >= cur.updated_at {
          *cur = r;
        }
      })
      .or_insert(r);
  }

  students
    .into_iter()
    .map(|student| {
      let status = latest
        .get(&student.student_id)
        .map(|r| RosterStatus::from(r.status))
        .unwrap_or(RosterStatus::Pending);
      RosterEntry { student, status, risk: None }
    })
    .collect()
}

/// Merge risk predictions into roster entries by student id. Predictions for
/// students not on the roster are dropped.
pub fn annotate_risk(roster: &mut [RosterEntry], predictions: Vec<Prediction>) {
  let by_id: HashMap<Uuid, Risk> = predictions
    .into_iter()
    .map(|p| (p.student.id, p.risk))
    .collect();

  for entry in roster {
    entry.risk = by_id.get(&entry.student.student_id).cloned();
  }
}

/// Students that "mark all present" should mark.
pub fn mark_all_targets(roster: &[RosterEntry]) -> Vec<Uuid> {
  roster
    .iter()
    .filter(|e| e.status.awaits_presence())
    .map(|e| e.student.student_id)
    .collect()
}
