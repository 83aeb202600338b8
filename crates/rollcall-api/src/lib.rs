//! JSON REST API for Rollcall.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::store::AttendanceStore`], with risk annotations from any
//! [`RiskSource`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollcall_api::api_router(ApiState::new(store)))
//! ```

pub mod attendance;
pub mod error;
pub mod lectures;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use rollcall_core::{
  risk::{NoForecast, RiskSource},
  store::AttendanceStore,
  week::{Clock, SystemClock},
};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, R> {
  pub store: Arc<S>,
  pub risk:  Arc<R>,
  pub clock: Arc<dyn Clock>,
}

impl<S, R> Clone for ApiState<S, R> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      risk:  Arc::clone(&self.risk),
      clock: Arc::clone(&self.clock),
    }
  }
}

impl<S> ApiState<S, NoForecast> {
  /// State with no forecast service and the wall clock.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      risk: Arc::new(NoForecast),
      clock: Arc::new(SystemClock),
    }
  }
}

impl<S, R> ApiState<S, R> {
  pub fn with_risk<R2>(self, risk: Arc<R2>) -> ApiState<S, R2> {
    ApiState { store: self.store, risk, clock: self.clock }
  }

  pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
    Self { clock: Arc::new(clock), ..self }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, R>(state: ApiState<S, R>) -> Router<()>
where
  S: AttendanceStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  R: RiskSource + 'static,
{
  Router::new()
    // Lectures
    .route(
      "/lectures",
      get(lectures::list::<S, R>).post(lectures::create::<S, R>),
    )
    .route("/lectures/{id}", get(lectures::get_one::<S, R>))
    .route("/lectures/{id}/status", patch(lectures::patch_status::<S, R>))
    .route(
      "/lectures/{id}/substitute",
      patch(lectures::patch_substitute::<S, R>),
    )
    // Students
    .route(
      "/students",
      get(students::list::<S, R>).post(students::create::<S, R>),
    )
    .route("/students/{id}", get(students::get_one::<S, R>))
    // Attendance
    .route(
      "/attendance/roster/{lecture_id}/{class_label}",
      get(attendance::roster::<S, R>),
    )
    .route("/attendance/mark", post(attendance::mark::<S, R>))
    .route("/attendance/mark-all", post(attendance::mark_all::<S, R>))
    .route(
      "/attendance/lecture/{lecture_id}",
      delete(attendance::reset::<S, R>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
