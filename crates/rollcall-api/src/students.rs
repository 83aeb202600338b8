//! Handlers for `/students` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students` | Optional `?class_year=..&division=..` |
//! | `POST` | `/students` | Body: [`StudentBody`]; returns 201 |
//! | `GET`  | `/students/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  lecture::normalize_label,
  risk::RiskSource,
  store::{AttendanceStore, StudentQuery},
  student::{NewStudent, Student},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub class_year: Option<String>,
  pub division:   Option<String>,
}

/// `GET /students[?class_year=<label>][&division=<label>]`
pub async fn list<S, R>(
  State(state): State<ApiState<S, R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let query = StudentQuery {
    class_year: params.class_year.as_deref().map(normalize_label),
    division:   params.division.as_deref().map(normalize_label),
  };
  let students = state
    .store
    .list_students(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(students))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StudentBody {
  pub name:       String,
  pub class_year: String,
  pub division:   String,
  #[serde(default)]
  pub department: String,
}

/// `POST /students`
pub async fn create<S, R>(
  State(state): State<ApiState<S, R>>,
  Json(body): Json<StudentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  if body.name.trim().is_empty()
    || body.class_year.trim().is_empty()
    || body.division.trim().is_empty()
  {
    return Err(ApiError::BadRequest(
      "name, class_year and division are required".into(),
    ));
  }

  let input = NewStudent {
    name:       body.name.trim().to_owned(),
    class_year: normalize_label(&body.class_year),
    division:   normalize_label(&body.division),
    department: body.department.trim().to_owned(),
  };
  let student = state
    .store
    .add_student(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/{id}`
pub async fn get_one<S, R>(
  State(state): State<ApiState<S, R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError>
where
  S: AttendanceStore,
  R: RiskSource,
{
  let student = state
    .store
    .get_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}
