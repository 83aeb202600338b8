//! [`SqliteStore`]: the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rollcall_core::{
  attendance::{AttendanceRecord, NewMark},
  lecture::{Lecture, LectureStatus, NewLecture},
  store::{AttendanceStore, LectureQuery, StudentQuery},
  student::{NewStudent, Student},
};

use crate::{
  Result,
  encode::{
    LECTURE_COLUMNS, RECORD_COLUMNS, RawLecture, RawRecord, RawStudent,
    STUDENT_COLUMNS, decode_dt, decode_uuid, encode_dt, encode_schedule,
    encode_time, encode_uuid, stored_precision,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-column UPDATE on `lectures` and re-read the row.
  async fn update_lecture(
    &self,
    id: Uuid,
    sql: &'static str,
    value: Option<String>,
  ) -> Result<Option<Lecture>> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![value, id_str])?))
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_lecture(id).await
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Lectures ──────────────────────────────────────────────────────────────

  async fn add_lecture(&self, input: NewLecture) -> Result<Lecture> {
    let lecture = Lecture {
      lecture_id:     Uuid::new_v4(),
      subject:        input.subject,
      syllabus_topic: input.syllabus_topic,
      class_year:     input.class_year,
      division:       input.division,
      schedule:       input.schedule,
      start_time:     input.start_time,
      end_time:       input.end_time,
      teacher_id:     input.teacher_id,
      substitute_id:  None,
      status_hint:    LectureStatus::Scheduled,
      created_at:     stored_precision(Utc::now()),
    };

    let (kind, day, date) = encode_schedule(&lecture.schedule);
    let params = (
      encode_uuid(lecture.lecture_id),
      lecture.subject.clone(),
      lecture.syllabus_topic.clone(),
      lecture.class_year.clone(),
      lecture.division.clone(),
      kind,
      day,
      date,
      encode_time(lecture.start_time),
      encode_time(lecture.end_time),
      encode_uuid(lecture.teacher_id),
      lecture.status_hint.as_ref().to_owned(),
      encode_dt(lecture.created_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lectures (
             lecture_id, subject, syllabus_topic, class_year, division,
             schedule_kind, day_of_week, lecture_date, start_time, end_time,
             teacher_id, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          params,
        )?;
        Ok(())
      })
      .await?;

    Ok(lecture)
  }

  async fn get_lecture(&self, id: Uuid) -> Result<Option<Lecture>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLecture> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {LECTURE_COLUMNS} FROM lectures WHERE lecture_id = ?1"),
              rusqlite::params![id_str],
              RawLecture::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLecture::into_lecture).transpose()
  }

  async fn list_lectures(&self, query: &LectureQuery) -> Result<Vec<Lecture>> {
    let teacher_str = query.teacher_id.map(encode_uuid);
    let class_year  = query.class_year.clone();
    let division    = query.division.clone();

    let raws: Vec<RawLecture> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LECTURE_COLUMNS} FROM lectures
           WHERE (?1 IS NULL OR teacher_id = ?1 OR substitute_id = ?1)
             AND (?2 IS NULL OR class_year = ?2)
             AND (?3 IS NULL OR division = ?3)"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![teacher_str, class_year, division],
            RawLecture::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut lectures = raws
      .into_iter()
      .map(RawLecture::into_lecture)
      .collect::<Result<Vec<_>>>()?;

    if let Some(day) = query.day {
      lectures.retain(|l| l.schedule.weekday() == day);
    }
    lectures.sort_by_key(|l| {
      (l.schedule.weekday().num_days_from_monday(), l.start_time, l.lecture_id)
    });

    Ok(lectures)
  }

  async fn set_status_hint(
    &self,
    id: Uuid,
    status: LectureStatus,
  ) -> Result<Option<Lecture>> {
    self
      .update_lecture(
        id,
        "UPDATE lectures SET status = ?1 WHERE lecture_id = ?2",
        Some(status.as_ref().to_owned()),
      )
      .await
  }

  async fn assign_substitute(
    &self,
    id: Uuid,
    substitute_id: Option<Uuid>,
  ) -> Result<Option<Lecture>> {
    self
      .update_lecture(
        id,
        "UPDATE lectures SET substitute_id = ?1 WHERE lecture_id = ?2",
        substitute_id.map(encode_uuid),
      )
      .await
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn add_student(&self, input: NewStudent) -> Result<Student> {
    let student = Student {
      student_id: Uuid::new_v4(),
      name:       input.name,
      class_year: input.class_year,
      division:   input.division,
      department: input.department,
      created_at: stored_precision(Utc::now()),
    };

    let params = (
      encode_uuid(student.student_id),
      student.name.clone(),
      student.class_year.clone(),
      student.division.clone(),
      student.department.clone(),
      encode_dt(student.created_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (student_id, name, class_year, division, department, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params,
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
              rusqlite::params![id_str],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_students(&self, query: &StudentQuery) -> Result<Vec<Student>> {
    let class_year = query.class_year.clone();
    let division   = query.division.clone();

    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students
           WHERE (?1 IS NULL OR class_year = ?1)
             AND (?2 IS NULL OR division = ?2)
           ORDER BY name, student_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![class_year, division], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn mark(
    &self,
    input: NewMark,
    window_start: Option<DateTime<Utc>>,
  ) -> Result<AttendanceRecord> {
    let at          = stored_precision(input.at);
    let new_id      = Uuid::new_v4();
    let new_id_str  = encode_uuid(new_id);
    let lecture_str = encode_uuid(input.lecture_id);
    let student_str = encode_uuid(input.student_id);
    let status_str  = input.status.as_ref().to_owned();
    let by_str      = encode_uuid(input.marked_by);
    let at_str      = encode_dt(at);
    let window_str  = window_start.map(encode_dt);

    let (record_id, created_at): (String, String) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<(String, String)> = tx
          .query_row(
            "SELECT record_id, created_at FROM attendance_records
             WHERE lecture_id = ?1
               AND student_id = ?2
               AND (?3 IS NULL OR created_at >= ?3)
             ORDER BY created_at DESC
             LIMIT 1",
            rusqlite::params![lecture_str, student_str, window_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let written = match existing {
          Some((record_id, created_at)) => {
            tx.execute(
              "UPDATE attendance_records
               SET status = ?1, marked_by = ?2, updated_at = ?3
               WHERE record_id = ?4",
              rusqlite::params![status_str, by_str, at_str, record_id],
            )?;
            (record_id, created_at)
          }
          None => {
            tx.execute(
              "INSERT INTO attendance_records (
                 record_id, lecture_id, student_id, status, marked_by,
                 created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
              rusqlite::params![
                new_id_str,
                lecture_str,
                student_str,
                status_str,
                by_str,
                at_str,
              ],
            )?;
            (new_id_str, at_str)
          }
        };

        tx.execute(
          "UPDATE lectures SET status = 'completed' WHERE lecture_id = ?1",
          rusqlite::params![lecture_str],
        )?;
        tx.commit()?;
        Ok(written)
      })
      .await?;

    Ok(AttendanceRecord {
      record_id:  decode_uuid(&record_id)?,
      lecture_id: input.lecture_id,
      student_id: input.student_id,
      status:     input.status,
      marked_by:  input.marked_by,
      created_at: decode_dt(&created_at)?,
      updated_at: at,
    })
  }

  async fn attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> Result<Vec<AttendanceRecord>> {
    let lecture_str = encode_uuid(lecture_id);
    let since_str   = since.map(encode_dt);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM attendance_records
           WHERE lecture_id = ?1
             AND (?2 IS NULL OR created_at >= ?2)
           ORDER BY created_at, record_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![lecture_str, since_str], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn has_attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> Result<bool> {
    let lecture_str = encode_uuid(lecture_id);
    let since_str   = since.map(encode_dt);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM attendance_records
             WHERE lecture_id = ?1
               AND (?2 IS NULL OR created_at >= ?2)
           )",
          rusqlite::params![lecture_str, since_str],
          |r| r.get::<_, bool>(0),
        )?)
      })
      .await?;

    Ok(exists)
  }

  async fn reset_attendance(&self, lecture_id: Uuid) -> Result<usize> {
    let lecture_str = encode_uuid(lecture_id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM attendance_records WHERE lecture_id = ?1",
          rusqlite::params![lecture_str],
        )?;
        tx.execute(
          "UPDATE lectures SET status = 'scheduled' WHERE lecture_id = ?1",
          rusqlite::params![lecture_str],
        )?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    Ok(removed)
  }
}
