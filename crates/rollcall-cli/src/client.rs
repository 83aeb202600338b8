//! Async HTTP client wrapping the rollcall JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Weekday;
use reqwest::{Client, Response};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus},
  reconcile::LectureView,
  roster::Roster,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Connection settings for the rollcall API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Acting user recorded on every mark.
  pub user_id:  Uuid,
}

/// Async HTTP client for the rollcall JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Debug, Deserialize)]
struct MarkResponse {
  record: AttendanceRecord,
}

/// Result of `POST /attendance/mark-all`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAllSummary {
  pub marked: usize,
  pub failed: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct ResetResponse {
  removed: usize,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or(text);
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Lectures ──────────────────────────────────────────────────────────────

  /// `GET /api/lectures[?teacher_id=..][&day=..]`
  pub async fn list_lectures(
    &self,
    teacher_id: Option<Uuid>,
    day: Option<Weekday>,
  ) -> Result<Vec<LectureView>> {
    let mut query = Vec::new();
    if let Some(id) = teacher_id {
      query.push(("teacher_id", id.to_string()));
    }
    if let Some(day) = day {
      query.push(("day", day.to_string()));
    }

    let resp = self
      .client
      .get(self.url("/lectures"))
      .query(&query)
      .send()
      .await
      .context("GET /lectures failed")?;
    Self::check(resp, "GET /lectures")
      .await?
      .json()
      .await
      .context("deserialising lectures")
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  /// `GET /api/attendance/roster/{lecture_id}/{class_label}`
  pub async fn roster(&self, lecture_id: Uuid, class_label: &str) -> Result<Roster> {
    let path = format!("/attendance/roster/{lecture_id}/{class_label}");
    let resp = self
      .client
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    Self::check(resp, "GET roster")
      .await?
      .json()
      .await
      .context("deserialising roster")
  }

  /// `POST /api/attendance/mark`
  pub async fn mark(
    &self,
    lecture_id: Uuid,
    student_id: Uuid,
    status: AttendanceStatus,
  ) -> Result<AttendanceRecord> {
    let resp = self
      .client
      .post(self.url("/attendance/mark"))
      .json(&json!({
        "lecture_id": lecture_id,
        "student_id": student_id,
        "status": status,
        "user_id": self.config.user_id,
      }))
      .send()
      .await
      .context("POST /attendance/mark failed")?;
    let body: MarkResponse = Self::check(resp, "POST /attendance/mark")
      .await?
      .json()
      .await
      .context("deserialising mark response")?;
    Ok(body.record)
  }

  /// `POST /api/attendance/mark-all`
  pub async fn mark_all(&self, lecture_id: Uuid, class_label: &str) -> Result<MarkAllSummary> {
    let resp = self
      .client
      .post(self.url("/attendance/mark-all"))
      .json(&json!({
        "lecture_id": lecture_id,
        "class_year": class_label,
        "user_id": self.config.user_id,
      }))
      .send()
      .await
      .context("POST /attendance/mark-all failed")?;
    Self::check(resp, "POST /attendance/mark-all")
      .await?
      .json()
      .await
      .context("deserialising mark-all response")
  }

  /// `DELETE /api/attendance/lecture/{lecture_id}`
  pub async fn reset(&self, lecture_id: Uuid) -> Result<usize> {
    let path = format!("/attendance/lecture/{lecture_id}");
    let resp = self
      .client
      .delete(self.url(&path))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;
    let body: ResetResponse = Self::check(resp, "DELETE attendance")
      .await?
      .json()
      .await
      .context("deserialising reset response")?;
    Ok(body.removed)
  }
}
