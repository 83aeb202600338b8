//! Error type for the Rollcall server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("forecast request failed: {0}")]
  Forecast(#[from] reqwest::Error),
}
