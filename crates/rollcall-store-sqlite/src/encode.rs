//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision, so lexicographic comparison in SQL matches chronological order.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{
  DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound as _, Utc, Weekday,
};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus},
  lecture::{Lecture, LectureStatus, Schedule},
  student::Student,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Truncate to the precision the database keeps.
pub fn stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Calendar values ─────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_weekday(d: Weekday) -> &'static str {
  match d {
    Weekday::Mon => "mon",
    Weekday::Tue => "tue",
    Weekday::Wed => "wed",
    Weekday::Thu => "thu",
    Weekday::Fri => "fri",
    Weekday::Sat => "sat",
    Weekday::Sun => "sun",
  }
}

pub fn decode_weekday(s: &str) -> Result<Weekday> {
  match s {
    "mon" => Ok(Weekday::Mon),
    "tue" => Ok(Weekday::Tue),
    "wed" => Ok(Weekday::Wed),
    "thu" => Ok(Weekday::Thu),
    "fri" => Ok(Weekday::Fri),
    "sat" => Ok(Weekday::Sat),
    "sun" => Ok(Weekday::Sun),
    other => Err(invalid("day_of_week", other)),
  }
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// `(schedule_kind, day_of_week, lecture_date)` columns.
pub fn encode_schedule(s: &Schedule) -> (&'static str, Option<String>, Option<String>) {
  match s {
    Schedule::Weekly { day } => ("weekly", Some(encode_weekday(*day).to_owned()), None),
    Schedule::Once { date } => ("once", None, Some(encode_date(*date))),
  }
}

pub fn decode_schedule(
  kind: &str,
  day: Option<&str>,
  date: Option<&str>,
) -> Result<Schedule> {
  match (kind, day, date) {
    ("weekly", Some(day), _) => Ok(Schedule::Weekly { day: decode_weekday(day)? }),
    ("once", _, Some(date)) => Ok(Schedule::Once { date: decode_date(date)? }),
    (other, ..) => Err(invalid("schedule_kind", other)),
  }
}

// ─── Status enums ────────────────────────────────────────────────────────────

pub fn decode_lecture_status(s: &str) -> Result<LectureStatus> {
  s.parse().map_err(|_| invalid("lectures.status", s))
}

pub fn decode_attendance_status(s: &str) -> Result<AttendanceStatus> {
  s.parse().map_err(|_| invalid("attendance_records.status", s))
}

fn invalid(column: &'static str, value: &str) -> Error {
  Error::InvalidValue { column, value: value.to_owned() }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawLecture::from_row`].
pub const LECTURE_COLUMNS: &str = "lecture_id, subject, syllabus_topic, class_year, \
   division, schedule_kind, day_of_week, lecture_date, start_time, end_time, \
   teacher_id, substitute_id, status, created_at";

/// Raw strings read directly from a `lectures` row.
pub struct RawLecture {
  pub lecture_id:     String,
  pub subject:        String,
  pub syllabus_topic: Option<String>,
  pub class_year:     String,
  pub division:       String,
  pub schedule_kind:  String,
  pub day_of_week:    Option<String>,
  pub lecture_date:   Option<String>,
  pub start_time:     String,
  pub end_time:       String,
  pub teacher_id:     String,
  pub substitute_id:  Option<String>,
  pub status:         String,
  pub created_at:     String,
}

impl RawLecture {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lecture_id:     row.get(0)?,
      subject:        row.get(1)?,
      syllabus_topic: row.get(2)?,
      class_year:     row.get(3)?,
      division:       row.get(4)?,
      schedule_kind:  row.get(5)?,
      day_of_week:    row.get(6)?,
      lecture_date:   row.get(7)?,
      start_time:     row.get(8)?,
      end_time:       row.get(9)?,
      teacher_id:     row.get(10)?,
      substitute_id:  row.get(11)?,
      status:         row.get(12)?,
      created_at:     row.get(13)?,
    })
  }

  pub fn into_lecture(self) -> Result<Lecture> {
    Ok(Lecture {
      lecture_id:     decode_uuid(&self.lecture_id)?,
      subject:        self.subject,
      syllabus_topic: self.syllabus_topic,
      class_year:     self.class_year,
      division:       self.division,
      schedule:       decode_schedule(
        &self.schedule_kind,
        self.day_of_week.as_deref(),
        self.lecture_date.as_deref(),
      )?,
      start_time:     decode_time(&self.start_time)?,
      end_time:       decode_time(&self.end_time)?,
      teacher_id:     decode_uuid(&self.teacher_id)?,
      substitute_id:  self.substitute_id.as_deref().map(decode_uuid).transpose()?,
      status_hint:    decode_lecture_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawStudent::from_row`].
pub const STUDENT_COLUMNS: &str =
  "student_id, name, class_year, division, department, created_at";

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub student_id: String,
  pub name:       String,
  pub class_year: String,
  pub division:   String,
  pub department: String,
  pub created_at: String,
}

impl RawStudent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id: row.get(0)?,
      name:       row.get(1)?,
      class_year: row.get(2)?,
      division:   row.get(3)?,
      department: row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id: decode_uuid(&self.student_id)?,
      name:       self.name,
      class_year: self.class_year,
      division:   self.division,
      department: self.department,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawRecord::from_row`].
pub const RECORD_COLUMNS: &str =
  "record_id, lecture_id, student_id, status, marked_by, created_at, updated_at";

/// Raw strings read directly from an `attendance_records` row.
pub struct RawRecord {
  pub record_id:  String,
  pub lecture_id: String,
  pub student_id: String,
  pub status:     String,
  pub marked_by:  String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:  row.get(0)?,
      lecture_id: row.get(1)?,
      student_id: row.get(2)?,
      status:     row.get(3)?,
      marked_by:  row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      record_id:  decode_uuid(&self.record_id)?,
      lecture_id: decode_uuid(&self.lecture_id)?,
      student_id: decode_uuid(&self.student_id)?,
      status:     decode_attendance_status(&self.status)?,
      marked_by:  decode_uuid(&self.marked_by)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
