//! HTTP client for the external forecast service.

use std::time::Duration;

use reqwest::Client;
use rollcall_core::risk::{Forecast, Prediction, RiskSource};

use crate::Error;

/// Fetches predictions with `GET <url>`.
#[derive(Debug, Clone)]
pub struct HttpForecast {
  client: Client,
  url:    String,
}

impl HttpForecast {
  pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into() })
  }
}

impl RiskSource for HttpForecast {
  type Error = Error;

  async fn forecast(&self) -> Result<Vec<Prediction>, Error> {
    let body: Forecast = self
      .client
      .get(&self.url)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;
    tracing::debug!(count = body.predictions.len(), "forecast received");
    Ok(body.predictions)
  }
}

/// The configured risk source: the HTTP service, or nothing.
#[derive(Debug, Clone)]
pub enum ForecastSource {
  Http(HttpForecast),
  Disabled,
}

impl ForecastSource {
  pub fn from_config(url: Option<&str>, timeout: Duration) -> Result<Self, Error> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
      Some(url) => Ok(Self::Http(HttpForecast::new(url, timeout)?)),
      None => Ok(Self::Disabled),
    }
  }
}

impl RiskSource for ForecastSource {
  type Error = Error;

  async fn forecast(&self) -> Result<Vec<Prediction>, Error> {
    match self {
      Self::Http(http) => http.forecast().await,
      Self::Disabled => Ok(Vec::new()),
    }
  }
}
