//! Roster view state with optimistic marks.
//!
//! A mark is shown immediately as *tentative*, then either confirmed or
//! reverted once the server answers. Nothing here talks to the network.

use std::collections::HashMap;

use rollcall_core::{
  attendance::AttendanceStatus,
  roster::{LectureMeta, Roster, RosterEntry, RosterStatus},
};
use uuid::Uuid;

/// One optimistic change awaiting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tentative {
  pub student_id: Uuid,
  pub previous:   RosterStatus,
  pub status:     RosterStatus,
}

#[derive(Debug, Default)]
pub struct RosterSession {
  pub entries: Vec<RosterEntry>,
  pub lecture: Option<LectureMeta>,
  pub loading: bool,
  in_flight:   HashMap<Uuid, usize>,
}

impl RosterSession {
  pub fn begin_load(&mut self) { self.loading = true; }

  /// Install a fetched roster, or report why it could not be fetched. The
  /// loading flag is cleared either way.
  pub fn finish_load(&mut self, result: Result<Roster, String>) -> Result<(), String> {
    self.loading = false;
    let roster = result?;
    self.entries = roster.roster;
    self.lecture = Some(roster.lecture);
    Ok(())
  }

  pub fn is_in_flight(&self, student_id: Uuid) -> bool {
    self.in_flight.get(&student_id).is_some_and(|n| *n > 0)
  }

  fn entry_mut(&mut self, student_id: Uuid) -> Option<&mut RosterEntry> {
    self.entries.iter_mut().find(|e| e.student.student_id == student_id)
  }

  fn begin(&mut self, student_id: Uuid, status: RosterStatus) -> Option<Tentative> {
    let entry = self.entry_mut(student_id)?;
    let previous = entry.status;
    entry.status = status;
    *self.in_flight.entry(student_id).or_default() += 1;
    Some(Tentative { student_id, previous, status })
  }

  fn settle(&mut self, student_id: Uuid) {
    if let Some(n) = self.in_flight.get_mut(&student_id) {
      *n = n.saturating_sub(1);
      if *n == 0 {
        self.in_flight.remove(&student_id);
      }
    }
  }

  /// Show `status` for the student right away. `None` if the student is not
  /// on the roster.
  pub fn apply(&mut self, student_id: Uuid, status: AttendanceStatus) -> Option<Tentative> {
    self.begin(student_id, status.into())
  }

  /// Tentatively mark every pending or absent student present.
  pub fn apply_all(&mut self) -> Vec<Tentative> {
    let targets: Vec<Uuid> = self
      .entries
      .iter()
      .filter(|e| e.status.awaits_presence())
      .map(|e| e.student.student_id)
      .collect();
    targets
      .into_iter()
      .filter_map(|id| self.begin(id, RosterStatus::Present))
      .collect()
  }

  /// The server accepted `t`.
  pub fn confirm(&mut self, t: &Tentative) { self.settle(t.student_id); }

  /// The server rejected `t`. The previous status is restored unless a newer
  /// change has replaced `t` in the meantime. Returns whether it was restored.
  pub fn revert(&mut self, t: &Tentative) -> bool {
    self.settle(t.student_id);
    match self.entry_mut(t.student_id) {
      Some(entry) if entry.status == t.status => {
        entry.status = t.previous;
        true
      }
      _ => false,
    }
  }

  pub fn count(&self, status: RosterStatus) -> usize {
    self.entries.iter().filter(|e| e.status == status).count()
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use rollcall_core::{lecture::LectureStatus, student::Student};

  use super::*;

  fn entry(name: &str, status: RosterStatus) -> RosterEntry {
    RosterEntry {
      student: Student {
        student_id: Uuid::new_v4(),
        name:       name.into(),
        class_year: "TY".into(),
        division:   "A".into(),
        department: String::new(),
        created_at: Utc::now(),
      },
      status,
      risk: None,
    }
  }

  fn roster(entries: Vec<RosterEntry>) -> Roster {
    Roster {
      roster:  entries,
      lecture: LectureMeta {
        lecture_id:     Uuid::new_v4(),
        subject:        "Compilers".into(),
        syllabus_topic: None,
        class_year:     "TY".into(),
        division:       "A".into(),
        status:         LectureStatus::Scheduled,
        week_start:     Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap(),
      },
    }
  }

  fn loaded(entries: Vec<RosterEntry>) -> RosterSession {
    let mut s = RosterSession::default();
    s.begin_load();
    s.finish_load(Ok(roster(entries))).unwrap();
    s
  }

  #[test]
  fn failed_load_clears_loading_flag() {
    let mut s = RosterSession::default();
    s.begin_load();
    assert!(s.loading);
    let err = s.finish_load(Err("timed out".into())).unwrap_err();
    assert_eq!(err, "timed out");
    assert!(!s.loading);
    assert!(s.lecture.is_none());
  }

  #[test]
  fn confirmed_mark_stays() {
    let mut s = loaded(vec![entry("Asha", RosterStatus::Pending)]);
    let id = s.entries[0].student.student_id;

    let t = s.apply(id, AttendanceStatus::Present).unwrap();
    assert_eq!(s.entries[0].status, RosterStatus::Present);
    assert!(s.is_in_flight(id));

    s.confirm(&t);
    assert_eq!(s.entries[0].status, RosterStatus::Present);
    assert!(!s.is_in_flight(id));
  }

  #[test]
  fn failed_mark_reverts_to_previous_status() {
    let mut s = loaded(vec![entry("Asha", RosterStatus::Absent)]);
    let id = s.entries[0].student.student_id;

    let t = s.apply(id, AttendanceStatus::Late).unwrap();
    assert!(s.revert(&t));
    assert_eq!(s.entries[0].status, RosterStatus::Absent);
    assert!(!s.is_in_flight(id));
  }

  #[test]
  fn stale_revert_keeps_newer_change() {
    let mut s = loaded(vec![entry("Asha", RosterStatus::Pending)]);
    let id = s.entries[0].student.student_id;

    let first = s.apply(id, AttendanceStatus::Absent).unwrap();
    let second = s.apply(id, AttendanceStatus::Present).unwrap();
    assert_eq!(second.previous, RosterStatus::Absent);

    assert!(!s.revert(&first));
    assert_eq!(s.entries[0].status, RosterStatus::Present);
    assert!(s.is_in_flight(id));

    s.confirm(&second);
    assert!(!s.is_in_flight(id));
  }

  #[test]
  fn apply_unknown_student_is_none() {
    let mut s = loaded(vec![entry("Asha", RosterStatus::Pending)]);
    assert!(s.apply(Uuid::new_v4(), AttendanceStatus::Present).is_none());
  }

  #[test]
  fn apply_all_only_touches_pending_and_absent() {
    let mut s = loaded(vec![
      entry("Asha", RosterStatus::Late),
      entry("Bilal", RosterStatus::Absent),
      entry("Chitra", RosterStatus::Pending),
      entry("Dev", RosterStatus::Present),
    ]);

    let changes = s.apply_all();
    assert_eq!(changes.len(), 2);
    assert_eq!(s.entries[0].status, RosterStatus::Late);
    assert_eq!(s.count(RosterStatus::Present), 3);

    // One student failed server-side.
    s.revert(&changes[0]);
    s.confirm(&changes[1]);
    assert_eq!(s.entries[1].status, RosterStatus::Absent);
    assert_eq!(s.entries[2].status, RosterStatus::Present);
  }
}
