//! Router-level tests against an in-memory `SqliteStore`.

use std::{convert::Infallible, io, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus, NewMark},
  lecture::{Lecture, LectureStatus, NewLecture, Schedule},
  risk::{PredictedStudent, Prediction, Risk, RiskSource},
  store::{AttendanceStore, LectureQuery, StudentQuery},
  student::{NewStudent, Student},
  week::{Clock, FixedClock},
};
use rollcall_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use super::*;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap() }

fn clock() -> FixedClock { FixedClock::at(now()) }

struct Fixture {
  store:    Arc<SqliteStore>,
  lecture:  Lecture,
  students: Vec<Student>,
}

async fn fixture() -> Fixture {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let lecture = store
    .add_lecture(NewLecture {
      subject:        "Operating Systems".into(),
      syllabus_topic: Some("Paging".into()),
      class_year:     "TY".into(),
      division:       "A".into(),
      schedule:       Schedule::Weekly { day: Weekday::Wed },
      start_time:     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
      end_time:       NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
      teacher_id:     Uuid::new_v4(),
    })
    .await
    .unwrap();

  let mut students = Vec::new();
  for name in ["Asha", "Bilal", "Chitra"] {
    students.push(store.add_student(NewStudent::new(name, "TY", "A")).await.unwrap());
  }
  // Same year, other division.
  store.add_student(NewStudent::new("Dev", "TY", "B")).await.unwrap();

  Fixture { store, lecture, students }
}

impl Fixture {
  fn app(&self) -> Router {
    api_router(ApiState::new(Arc::clone(&self.store)).with_clock(clock()))
  }

  fn app_with<R: RiskSource + 'static>(&self, risk: R) -> Router {
    let state = ApiState::new(Arc::clone(&self.store))
      .with_clock(clock())
      .with_risk(Arc::new(risk));
    api_router(state)
  }

  fn roster_uri(&self) -> String {
    format!("/attendance/roster/{}/TY-A", self.lecture.lecture_id)
  }

  /// Mark a student directly in last week's occurrence.
  async fn mark_last_week(&self, student_id: Uuid, status: AttendanceStatus) {
    let last_week = clock().week_start() - Duration::days(7);
    self
      .mark_at(student_id, status, now() - Duration::days(7), Some(last_week))
      .await;
  }

  /// Write a mark straight to the store, bypassing the router.
  async fn mark_at(
    &self,
    student_id: Uuid,
    status: AttendanceStatus,
    at: DateTime<Utc>,
    window: Option<DateTime<Utc>>,
  ) {
    self
      .store
      .mark(
        NewMark {
          lecture_id: self.lecture.lecture_id,
          student_id,
          status,
          marked_by: Uuid::new_v4(),
          at,
        },
        window,
      )
      .await
      .unwrap();
  }
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

fn statuses(roster: &Value) -> Vec<(String, String)> {
  roster["roster"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| {
      (
        e["name"].as_str().unwrap().to_owned(),
        e["status"].as_str().unwrap().to_owned(),
      )
    })
    .collect()
}

struct FixedRisk(Vec<Prediction>);

impl RiskSource for FixedRisk {
  type Error = Infallible;

  async fn forecast(&self) -> Result<Vec<Prediction>, Infallible> { Ok(self.0.clone()) }
}

struct DownRisk;

impl RiskSource for DownRisk {
  type Error = io::Error;

  async fn forecast(&self) -> Result<Vec<Prediction>, io::Error> {
    Err(io::Error::other("connection refused"))
  }
}

/// Delegates to a `SqliteStore` but refuses every mark for one student.
struct RefusingStore {
  inner:  Arc<SqliteStore>,
  refuse: Uuid,
}

impl AttendanceStore for RefusingStore {
  type Error = io::Error;

  async fn add_lecture(&self, input: NewLecture) -> Result<Lecture, io::Error> {
    self.inner.add_lecture(input).await.map_err(io::Error::other)
  }

  async fn get_lecture(&self, id: Uuid) -> Result<Option<Lecture>, io::Error> {
    self.inner.get_lecture(id).await.map_err(io::Error::other)
  }

  async fn list_lectures<'a>(&'a self, query: &'a LectureQuery) -> Result<Vec<Lecture>, io::Error> {
    self.inner.list_lectures(query).await.map_err(io::Error::other)
  }

  async fn set_status_hint(
    &self,
    id: Uuid,
    status: LectureStatus,
  ) -> Result<Option<Lecture>, io::Error> {
    self.inner.set_status_hint(id, status).await.map_err(io::Error::other)
  }

  async fn assign_substitute(
    &self,
    id: Uuid,
    substitute_id: Option<Uuid>,
  ) -> Result<Option<Lecture>, io::Error> {
    self
      .inner
      .assign_substitute(id, substitute_id)
      .await
      .map_err(io::Error::other)
  }

  async fn add_student(&self, input: NewStudent) -> Result<Student, io::Error> {
    self.inner.add_student(input).await.map_err(io::Error::other)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>, io::Error> {
    self.inner.get_student(id).await.map_err(io::Error::other)
  }

  async fn list_students<'a>(&'a self, query: &'a StudentQuery) -> Result<Vec<Student>, io::Error> {
    self.inner.list_students(query).await.map_err(io::Error::other)
  }

  async fn mark(
    &self,
    input: NewMark,
    window_start: Option<DateTime<Utc>>,
  ) -> Result<AttendanceRecord, io::Error> {
    if input.student_id == self.refuse {
      return Err(io::Error::other("disk full"));
    }
    self.inner.mark(input, window_start).await.map_err(io::Error::other)
  }

  async fn attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> Result<Vec<AttendanceRecord>, io::Error> {
    self
      .inner
      .attendance_since(lecture_id, since)
      .await
      .map_err(io::Error::other)
  }

  async fn has_attendance_since(
    &self,
    lecture_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> Result<bool, io::Error> {
    self
      .inner
      .has_attendance_since(lecture_id, since)
      .await
      .map_err(io::Error::other)
  }

  async fn reset_attendance(&self, lecture_id: Uuid) -> Result<usize, io::Error> {
    self.inner.reset_attendance(lecture_id).await.map_err(io::Error::other)
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn roster_unknown_lecture_is_404() {
  let f = fixture().await;
  let uri = format!("/attendance/roster/{}/TY-A", Uuid::new_v4());
  let (status, body) = send(f.app(), "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn fresh_lecture_lists_class_as_pending() {
  let f = fixture().await;
  let (status, body) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(status, StatusCode::OK);

  assert_eq!(statuses(&body), vec![
    ("Asha".to_owned(), "pending".to_owned()),
    ("Bilal".to_owned(), "pending".to_owned()),
    ("Chitra".to_owned(), "pending".to_owned()),
  ]);
  assert_eq!(body["lecture"]["status"], "scheduled");
  assert_eq!(body["lecture"]["subject"], "Operating Systems");
}

#[tokio::test]
async fn last_weeks_completion_rolls_over_to_scheduled() {
  let f = fixture().await;
  f.mark_last_week(f.students[0].student_id, AttendanceStatus::Present).await;

  // The stored hint still says completed.
  let stored = f.store.get_lecture(f.lecture.lecture_id).await.unwrap().unwrap();
  assert_eq!(stored.status_hint.as_ref(), "completed");

  let (status, body) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["lecture"]["status"], "scheduled");
  assert!(statuses(&body).iter().all(|(_, s)| s == "pending"));
}

#[tokio::test]
async fn mark_at_week_start_counts_for_this_week() {
  let f = fixture().await;
  let week_start = clock().week_start();
  f.mark_at(f.students[0].student_id, AttendanceStatus::Present, week_start, Some(week_start))
    .await;

  let (_, body) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(body["lecture"]["status"], "completed");
  assert_eq!(statuses(&body)[0], ("Asha".to_owned(), "present".to_owned()));
}

#[tokio::test]
async fn mark_just_before_week_start_belongs_to_last_week() {
  let f = fixture().await;
  let week_start = clock().week_start();
  f.mark_at(
    f.students[0].student_id,
    AttendanceStatus::Present,
    week_start - Duration::microseconds(1),
    Some(week_start - Duration::days(7)),
  )
  .await;

  let (_, body) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(body["lecture"]["status"], "scheduled");
  assert!(statuses(&body).iter().all(|(_, s)| s == "pending"));
}

#[tokio::test]
async fn one_off_lecture_keeps_marks_from_earlier_weeks() {
  let f = fixture().await;
  let once = f
    .store
    .add_lecture(NewLecture {
      subject:        "Guest Lecture".into(),
      syllabus_topic: None,
      class_year:     "TY".into(),
      division:       "A".into(),
      schedule:       Schedule::Once {
        date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
      },
      start_time:     NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
      end_time:       NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
      teacher_id:     Uuid::new_v4(),
    })
    .await
    .unwrap();
  f.store
    .mark(
      NewMark {
        lecture_id: once.lecture_id,
        student_id: f.students[2].student_id,
        status:     AttendanceStatus::Late,
        marked_by:  once.teacher_id,
        at:         now() - Duration::days(14),
      },
      None,
    )
    .await
    .unwrap();

  let uri = format!("/attendance/roster/{}/TY-A", once.lecture_id);
  let (status, body) = send(f.app(), "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["lecture"]["status"], "completed");
  assert_eq!(statuses(&body), vec![
    ("Asha".to_owned(), "pending".to_owned()),
    ("Bilal".to_owned(), "pending".to_owned()),
    ("Chitra".to_owned(), "late".to_owned()),
  ]);
}

#[tokio::test]
async fn mark_then_roster_shows_present() {
  let f = fixture().await;
  let student = &f.students[1];

  let (status, body) = send(
    f.app(),
    "POST",
    "/attendance/mark",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "student_id": student.student_id,
      "status": "present",
      "user_id": f.lecture.teacher_id,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  assert_eq!(body["record"]["status"], "present");

  let (_, roster) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(roster["lecture"]["status"], "completed");
  assert_eq!(statuses(&roster), vec![
    ("Asha".to_owned(), "pending".to_owned()),
    ("Bilal".to_owned(), "present".to_owned()),
    ("Chitra".to_owned(), "pending".to_owned()),
  ]);
}

#[tokio::test]
async fn remark_overwrites_within_the_week() {
  let f = fixture().await;
  let student_id = f.students[0].student_id;

  for status in ["absent", "late"] {
    let (code, _) = send(
      f.app(),
      "POST",
      "/attendance/mark",
      Some(json!({
        "lecture_id": f.lecture.lecture_id,
        "student_id": student_id,
        "status": status,
        "user_id": f.lecture.teacher_id,
      })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
  }

  let rows = f
    .store
    .attendance_since(f.lecture.lecture_id, Some(clock().week_start()))
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].status, AttendanceStatus::Late);
}

#[tokio::test]
async fn class_year_label_is_accepted() {
  let f = fixture().await;
  let uri = format!("/attendance/roster/{}/ty", f.lecture.lecture_id);
  let (status, _) = send(f.app(), "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn mismatched_class_label_is_400() {
  let f = fixture().await;
  let uri = format!("/attendance/roster/{}/SY-A", f.lecture.lecture_id);
  let (status, body) = send(f.app(), "GET", &uri, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("TY-A"));
}

#[tokio::test]
async fn roster_carries_risk_annotations() {
  let f = fixture().await;
  let target = &f.students[2];
  let risk = FixedRisk(vec![
    Prediction {
      student: PredictedStudent { id: target.student_id, name: None },
      risk:    Risk { risk_score: 0.9, reason: Some("missed three".into()) },
    },
    Prediction {
      student: PredictedStudent { id: Uuid::new_v4(), name: None },
      risk:    Risk { risk_score: 0.4, reason: None },
    },
  ]);

  let (status, body) = send(f.app_with(risk), "GET", &f.roster_uri(), None).await;
  assert_eq!(status, StatusCode::OK);

  let entries = body["roster"].as_array().unwrap();
  assert_eq!(entries.len(), 3);
  assert!(entries[0].get("risk").is_none());
  assert_eq!(entries[2]["risk"]["riskScore"], 0.9);
}

#[tokio::test]
async fn forecast_failure_still_serves_roster() {
  let f = fixture().await;
  let (status, body) = send(f.app_with(DownRisk), "GET", &f.roster_uri(), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["roster"].as_array().unwrap().len(), 3);
}

// ─── Mark ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_unknown_student_is_404() {
  let f = fixture().await;
  let (status, _) = send(
    f.app(),
    "POST",
    "/attendance/mark",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "student_id": Uuid::new_v4(),
      "status": "present",
      "user_id": Uuid::new_v4(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mark_student_from_other_division_is_400() {
  let f = fixture().await;
  let outsider = f
    .store
    .add_student(NewStudent::new("Esha", "TY", "B"))
    .await
    .unwrap();

  let (status, _) = send(
    f.app(),
    "POST",
    "/attendance/mark",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "student_id": outsider.student_id,
      "status": "present",
      "user_id": Uuid::new_v4(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mark_all_leaves_present_and_late_alone() {
  let f = fixture().await;
  let store = &f.store;
  let at = now() - Duration::hours(1);
  let window = Some(clock().week_start());
  for (student, status) in [
    (&f.students[0], AttendanceStatus::Late),
    (&f.students[1], AttendanceStatus::Absent),
  ] {
    store
      .mark(
        NewMark {
          lecture_id: f.lecture.lecture_id,
          student_id: student.student_id,
          status,
          marked_by: f.lecture.teacher_id,
          at,
        },
        window,
      )
      .await
      .unwrap();
  }

  let (status, body) = send(
    f.app(),
    "POST",
    "/attendance/mark-all",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "class_year": "TY-A",
      "user_id": f.lecture.teacher_id,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  assert_eq!(body["marked"], 2);
  assert_eq!(body["failed"], json!([]));

  let (_, roster) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(statuses(&roster), vec![
    ("Asha".to_owned(), "late".to_owned()),
    ("Bilal".to_owned(), "present".to_owned()),
    ("Chitra".to_owned(), "present".to_owned()),
  ]);
}

#[tokio::test]
async fn mark_all_reports_students_it_could_not_mark() {
  let f = fixture().await;
  let refused = f.students[1].student_id;
  let store = RefusingStore { inner: Arc::clone(&f.store), refuse: refused };
  let app = api_router(ApiState::new(Arc::new(store)).with_clock(clock()));

  let (status, body) = send(
    app,
    "POST",
    "/attendance/mark-all",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "class_year": "TY-A",
      "user_id": f.lecture.teacher_id,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], false);
  assert_eq!(body["marked"], f.students.len() - 1);
  assert_eq!(body["failed"], json!([refused]));

  // The marks that went through stay written.
  let (_, roster) = send(f.app(), "GET", &f.roster_uri(), None).await;
  assert_eq!(statuses(&roster), vec![
    ("Asha".to_owned(), "present".to_owned()),
    ("Bilal".to_owned(), "pending".to_owned()),
    ("Chitra".to_owned(), "present".to_owned()),
  ]);
}

#[tokio::test]
async fn reset_clears_the_occurrence() {
  let f = fixture().await;
  f.mark_last_week(f.students[0].student_id, AttendanceStatus::Absent).await;
  send(
    f.app(),
    "POST",
    "/attendance/mark",
    Some(json!({
      "lecture_id": f.lecture.lecture_id,
      "student_id": f.students[0].student_id,
      "status": "present",
      "user_id": f.lecture.teacher_id,
    })),
  )
  .await;

  let uri = format!("/attendance/lecture/{}", f.lecture.lecture_id);
  let (status, body) = send(f.app(), "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["removed"], 2);

  let uri = format!("/lectures/{}", f.lecture.lecture_id);
  let (_, lecture) = send(f.app(), "GET", &uri, None).await;
  assert_eq!(lecture["status"], "scheduled");
  assert_eq!(lecture["status_hint"], "scheduled");
}

// ─── Lectures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lecture_list_reports_effective_status() {
  let f = fixture().await;
  f.mark_last_week(f.students[0].student_id, AttendanceStatus::Present).await;

  let (status, body) = send(f.app(), "GET", "/lectures?class_year=TY", None).await;
  assert_eq!(status, StatusCode::OK);
  let lectures = body.as_array().unwrap();
  assert_eq!(lectures.len(), 1);
  assert_eq!(lectures[0]["status"], "scheduled");
  assert_eq!(lectures[0]["status_hint"], "completed");
}

#[tokio::test]
async fn patching_the_hint_does_not_change_effective_status() {
  let f = fixture().await;
  let uri = format!("/lectures/{}/status", f.lecture.lecture_id);
  let (status, body) =
    send(f.app(), "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status_hint"], "completed");
  assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn substitute_can_be_assigned_and_cleared() {
  let f = fixture().await;
  let sub = Uuid::new_v4();
  let uri = format!("/lectures/{}/substitute", f.lecture.lecture_id);

  let (status, body) =
    send(f.app(), "PATCH", &uri, Some(json!({ "substitute_id": sub }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["substitute_id"], sub.to_string());

  let by_sub = format!("/lectures?teacher_id={sub}");
  let (_, listed) = send(f.app(), "GET", &by_sub, None).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let (_, body) =
    send(f.app(), "PATCH", &uri, Some(json!({ "substitute_id": null }))).await;
  assert!(body["substitute_id"].is_null());
}

#[tokio::test]
async fn create_lecture_rejects_inverted_times() {
  let f = fixture().await;
  let (status, _) = send(
    f.app(),
    "POST",
    "/lectures",
    Some(json!({
      "subject": "Networks",
      "class_year": "TY",
      "division": "A",
      "schedule": { "kind": "weekly", "day": "Thu" },
      "start_time": "11:00:00",
      "end_time": "10:00:00",
      "teacher_id": Uuid::new_v4(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_lecture_returns_201() {
  let f = fixture().await;
  let (status, body) = send(
    f.app(),
    "POST",
    "/lectures",
    Some(json!({
      "subject": "Networks",
      "class_year": "TY",
      "division": "A",
      "schedule": { "kind": "once", "date": "2026-10-16" },
      "start_time": "10:00:00",
      "end_time": "11:00:00",
      "teacher_id": Uuid::new_v4(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "scheduled");
  assert_eq!(body["schedule"]["kind"], "once");
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn students_filter_by_division() {
  let f = fixture().await;
  let (status, body) =
    send(f.app(), "GET", "/students?class_year=TY&division=B", None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["name"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(names, vec!["Dev".to_owned()]);
}

#[tokio::test]
async fn create_student_requires_a_name() {
  let f = fixture().await;
  let (status, _) = send(
    f.app(),
    "POST",
    "/students",
    Some(json!({ "name": " ", "class_year": "TY", "division": "A" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_labels_are_normalised() {
  let f = fixture().await;
  let (status, body) = send(
    f.app(),
    "POST",
    "/students",
    Some(json!({ "name": "Esha", "class_year": "ty", "division": " a " })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["class_year"], "TY");
  assert_eq!(body["division"], "A");

  let (_, roster) = send(f.app(), "GET", &f.roster_uri(), None).await;
  let names: Vec<_> = statuses(&roster).into_iter().map(|(n, _)| n).collect();
  assert_eq!(names, vec!["Asha", "Bilal", "Chitra", "Esha"]);

  let (_, filtered) = send(f.app(), "GET", "/students?class_year=ty&division=b", None).await;
  assert_eq!(filtered.as_array().unwrap().len(), 1);
}
