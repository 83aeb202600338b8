//! Handlers for `/lectures` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/lectures` | Optional `teacher_id`, `class_year`, `division`, `day` |
//! | `POST`  | `/lectures` | Body: [`LectureBody`]; returns 201 |
//! | `GET`   | `/lectures/{id}` | 404 if not found |
//! | `PATCH` | `/lectures/{id}/status` | Body: `{"status":"completed"}`; patches the stored hint |
//! | `PATCH` | `/lectures/{id}/substitute` | Body: `{"substitute_id":<uuid or null>}` |
//!
//! Every lecture in a response carries its effective `status`, derived from
//! this occurrence's attendance, next to the stored `status_hint`.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use rollcall_core::{
  lecture::{Lecture, LectureStatus, NewLecture, Schedule, normalize_label},
  reconcile::{LectureView, occurrence_window},
  risk::RiskSource,
  store::{AttendanceStore, LectureQuery},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Attach the effective status to `lecture`.
pub(crate) async fn reconcile<S>(
  store: &S,
  week_start: DateTime<Utc>,
  lecture: Lecture,
) -> Result<LectureView, ApiError>
where
  S: AttendanceStore,
{
  let window = occurrence_window(&lecture, week_start);
  let has_attendance = store
    .has_attendance_since(lecture.lecture_id, window)
    .await
    .map_err(ApiError::store)?;

  let view = LectureView::new(lecture, has_attendance);
  if view.is_stale() {
    tracing::debug!(
      lecture_id = %view.lecture.lecture_id,
      hint = %view.lecture.status_hint,
      status = %view.status,
      "stored status hint is stale",
    );
  }
  Ok(view)
}

pub(crate) async fn require_lecture<S>(store: &S, id: Uuid) -> Result<Lecture, ApiError>
where
  S: AttendanceStore,
{
  store
    .get_lecture(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("lecture {id} not found")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub teacher_id: Option<Uuid>,
  pub class_year: Option<String>,
  pub division:   Option<String>,
  /// e.g. `mon` or `monday`.
  pub day:        Option<Weekday>,
}

/// `GET /lectures[?teacher_id=..][&class_year=..][&division=..][&day=..]`
pub async fn list<S, R>(
  State(state): State<ApiState<S, R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LectureView>>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let query = LectureQuery {
    teacher_id: params.teacher_id,
    class_year: params.class_year.as_deref().map(normalize_label),
    division:   params.division.as_deref().map(normalize_label),
    day:        params.day,
  };

  let lectures = state
    .store
    .list_lectures(&query)
    .await
    .map_err(ApiError::store)?;

  let week_start = state.clock.week_start();
  let mut views = Vec::with_capacity(lectures.len());
  for lecture in lectures {
    views.push(reconcile(&*state.store, week_start, lecture).await?);
  }
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /lectures`.
#[derive(Debug, Deserialize)]
pub struct LectureBody {
  pub subject:        String,
  pub syllabus_topic: Option<String>,
  pub class_year:     String,
  pub division:       String,
  pub schedule:       Schedule,
  pub start_time:     NaiveTime,
  pub end_time:       NaiveTime,
  pub teacher_id:     Uuid,
}

impl LectureBody {
  fn validate(self) -> Result<NewLecture, ApiError> {
    for (field, value) in [
      ("subject", &self.subject),
      ("class_year", &self.class_year),
      ("division", &self.division),
    ] {
      if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
      }
    }
    if self.start_time >= self.end_time {
      return Err(ApiError::BadRequest(
        "start_time must be before end_time".into(),
      ));
    }

    Ok(NewLecture {
      subject:        self.subject.trim().to_owned(),
      syllabus_topic: self.syllabus_topic.filter(|t| !t.trim().is_empty()),
      class_year:     normalize_label(&self.class_year),
      division:       normalize_label(&self.division),
      schedule:       self.schedule,
      start_time:     self.start_time,
      end_time:       self.end_time,
      teacher_id:     self.teacher_id,
    })
  }
}

/// `POST /lectures`. Returns 201 and the stored lecture.
pub async fn create<S, R>(
  State(state): State<ApiState<S, R>>,
  Json(body): Json<LectureBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let lecture = state
    .store
    .add_lecture(body.validate()?)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    lecture_id = %lecture.lecture_id,
    class = %lecture.class_label(),
    subject = %lecture.subject,
    "lecture scheduled",
  );
  Ok((StatusCode::CREATED, Json(LectureView::new(lecture, false))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /lectures/{id}`
pub async fn get_one<S, R>(
  State(state): State<ApiState<S, R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LectureView>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let lecture = require_lecture(&*state.store, id).await?;
  let view = reconcile(&*state.store, state.clock.week_start(), lecture).await?;
  Ok(Json(view))
}

// ─── Patch status hint ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: LectureStatus,
}

/// `PATCH /lectures/{id}/status`
///
/// Only the stored hint changes; the returned `status` is still derived.
pub async fn patch_status<S, R>(
  State(state): State<ApiState<S, R>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<LectureView>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let lecture = state
    .store
    .set_status_hint(id, body.status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("lecture {id} not found")))?;

  let view = reconcile(&*state.store, state.clock.week_start(), lecture).await?;
  Ok(Json(view))
}

// ─── Patch substitute ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubstituteBody {
  pub substitute_id: Option<Uuid>,
}

/// `PATCH /lectures/{id}/substitute`. `null` clears the assignment.
pub async fn patch_substitute<S, R>(
  State(state): State<ApiState<S, R>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SubstituteBody>,
) -> Result<Json<LectureView>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let lecture = state
    .store
    .assign_substitute(id, body.substitute_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("lecture {id} not found")))?;

  match lecture.substitute_id {
    Some(sub) => tracing::info!(lecture_id = %id, substitute_id = %sub, "substitute assigned"),
    None => tracing::info!(lecture_id = %id, "substitute cleared"),
  }

  let view = reconcile(&*state.store, state.clock.week_start(), lecture).await?;
  Ok(Json(view))
}
