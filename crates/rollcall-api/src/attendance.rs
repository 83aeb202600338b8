//! Handlers for `/attendance` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/attendance/roster/{lecture_id}/{class_label}` | Roster for this occurrence |
//! | `POST`   | `/attendance/mark` | Body: [`MarkBody`] |
//! | `POST`   | `/attendance/mark-all` | Body: [`MarkAllBody`]; pending/absent → present |
//! | `DELETE` | `/attendance/lecture/{lecture_id}` | Bulk reset |

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus, NewMark},
  reconcile::{LectureView, occurrence_window},
  risk::{Prediction, RiskSource},
  roster::{LectureMeta, Roster, annotate_risk, build_roster, mark_all_targets},
  store::{AttendanceStore, StudentQuery},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, lectures::require_lecture};

/// Build the roster of `lecture_id` for the week starting at `week_start`.
///
/// The effective lecture status is derived from the same attendance rows the
/// roster is built from. The lecture is handed back alongside the roster.
pub(crate) async fn load_roster<S>(
  store: &S,
  week_start: DateTime<Utc>,
  lecture_id: Uuid,
  class_label: &str,
) -> Result<(LectureView, Roster), ApiError>
where
  S: AttendanceStore,
{
  let lecture = require_lecture(store, lecture_id).await?;
  lecture.check_label(class_label)?;

  let students = store
    .list_students(&StudentQuery::class(&lecture.class_year, &lecture.division))
    .await
    .map_err(ApiError::store)?;

  let window = occurrence_window(&lecture, week_start);
  let records = store
    .attendance_since(lecture_id, window)
    .await
    .map_err(ApiError::store)?;

  let view = LectureView::new(lecture, !records.is_empty());
  let roster = Roster {
    roster:  build_roster(students, &records),
    lecture: LectureMeta::from_view(&view, week_start),
  };
  Ok((view, roster))
}

/// Predictions from `risk`, or none if the call fails.
async fn predictions<R: RiskSource>(risk: &R) -> Vec<Prediction> {
  match risk.forecast().await {
    Ok(p) => p,
    Err(e) => {
      tracing::warn!(error = %e, "forecast unavailable; roster served without risk");
      Vec::new()
    }
  }
}

// ─── Roster ───────────────────────────────────────────────────────────────────

/// `GET /attendance/roster/{lecture_id}/{class_label}`
pub async fn roster<S, R>(
  State(state): State<ApiState<S, R>>,
  Path((lecture_id, class_label)): Path<(Uuid, String)>,
) -> Result<Json<Roster>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let week_start = state.clock.week_start();
  let (_, mut roster) =
    load_roster(&*state.store, week_start, lecture_id, &class_label).await?;
  annotate_risk(&mut roster.roster, predictions(&*state.risk).await);
  Ok(Json(roster))
}

// ─── Mark ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkBody {
  pub lecture_id: Uuid,
  pub student_id: Uuid,
  pub status:     AttendanceStatus,
  /// The acting user.
  pub user_id:    Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkResponse {
  pub ok:     bool,
  pub record: AttendanceRecord,
}

/// `POST /attendance/mark`
pub async fn mark<S, R>(
  State(state): State<ApiState<S, R>>,
  Json(body): Json<MarkBody>,
) -> Result<Json<MarkResponse>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let lecture = require_lecture(&*state.store, body.lecture_id).await?;
  let student = state
    .store
    .get_student(body.student_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {} not found", body.student_id)))?;
  lecture.check_enrolled(&student)?;

  let window = occurrence_window(&lecture, state.clock.week_start());
  let input = NewMark {
    lecture_id: lecture.lecture_id,
    student_id: student.student_id,
    status:     body.status,
    marked_by:  body.user_id,
    at:         state.clock.now().with_timezone(&Utc),
  };

  let record = state
    .store
    .mark(input, window)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    lecture_id = %record.lecture_id,
    student_id = %record.student_id,
    status = %record.status,
    marked_by = %record.marked_by,
    "attendance marked",
  );
  Ok(Json(MarkResponse { ok: true, record }))
}

// ─── Mark all ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkAllBody {
  pub lecture_id: Uuid,
  /// Class label, as in the roster path.
  pub class_year: String,
  pub user_id:    Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllResponse {
  /// `false` when any individual mark failed.
  pub ok:     bool,
  pub marked: usize,
  /// Students whose mark could not be written.
  pub failed: Vec<Uuid>,
}

/// `POST /attendance/mark-all`
///
/// Marks every pending or absent student present. Marks are written one by
/// one; a failure is logged and does not undo the marks already written.
pub async fn mark_all<S, R>(
  State(state): State<ApiState<S, R>>,
  Json(body): Json<MarkAllBody>,
) -> Result<Json<MarkAllResponse>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let week_start = state.clock.week_start();
  let (view, roster) =
    load_roster(&*state.store, week_start, body.lecture_id, &body.class_year).await?;

  let window = occurrence_window(&view.lecture, week_start);
  let at = state.clock.now().with_timezone(&Utc);
  let mut marked = 0;
  let mut failed = Vec::new();

  for student_id in mark_all_targets(&roster.roster) {
    let input = NewMark {
      lecture_id: body.lecture_id,
      student_id,
      status: AttendanceStatus::Present,
      marked_by: body.user_id,
      at,
    };
    match state.store.mark(input, window).await {
      Ok(_) => marked += 1,
      Err(e) => {
        tracing::warn!(
          lecture_id = %body.lecture_id,
          student_id = %student_id,
          error = %e,
          "mark-all: skipping student",
        );
        failed.push(student_id);
      }
    }
  }

  tracing::info!(
    lecture_id = %body.lecture_id,
    marked,
    failed = failed.len(),
    "mark-all finished",
  );
  Ok(Json(MarkAllResponse { ok: failed.is_empty(), marked, failed }))
}

// ─── Reset ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
  pub ok:      bool,
  pub removed: usize,
}

/// `DELETE /attendance/lecture/{lecture_id}`
pub async fn reset<S, R>(
  State(state): State<ApiState<S, R>>,
  Path(lecture_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  require_lecture(&*state.store, lecture_id).await?;
  let removed = state
    .store
    .reset_attendance(lecture_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(lecture_id = %lecture_id, removed, "attendance reset");
  Ok(Json(ResetResponse { ok: true, removed }))
}
