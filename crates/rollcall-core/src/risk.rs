//! Risk predictions from the external forecast service.
//!
//! The service is a collaborator, not part of this system: its output only
//! annotates roster entries, and a failed call never blocks a roster.

use std::{convert::Infallible, future::Future};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-student risk score as reported by the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
  #[serde(rename = "riskScore")]
  pub risk_score: f64,
  #[serde(default)]
  pub reason:     Option<String>,
}

/// The student reference inside a prediction. Extra fields sent by the
/// service are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedStudent {
  pub id:   Uuid,
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  pub student: PredictedStudent,
  pub risk:    Risk,
}

/// Response body of `GET /ai/forecast`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
  #[serde(default)]
  pub predictions: Vec<Prediction>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a source of risk predictions.
pub trait RiskSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn forecast(
    &self,
  ) -> impl Future<Output = Result<Vec<Prediction>, Self::Error>> + Send + '_;
}

/// A source that never predicts anything. Used when no forecast service is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForecast;

impl RiskSource for NoForecast {
  type Error = Infallible;

  async fn forecast(&self) -> Result<Vec<Prediction>, Infallible> { Ok(Vec::new()) }
}
