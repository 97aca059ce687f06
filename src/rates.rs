//! # Exchange Rate Module
//!
//! Official exchange rates from the National Bank of Ukraine statistics
//! service. A lookup first asks for the rate published on a given day and,
//! if that query comes back empty, asks once more for the latest published
//! rate. Failures never block the calculator: callers keep whatever rate
//! they already had.

use chrono::NaiveDate;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::RateConfig;
use crate::errors::RateError;
use crate::input::CalculatorSession;

/// One entry of the NBU exchange response array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NbuRate {
    #[serde(default)]
    pub r030: Option<u32>,
    #[serde(default)]
    pub txt: Option<String>,
    pub rate: f64,
    #[serde(default)]
    pub cc: Option<String>,
    pub exchangedate: String,
}

/// Rate as published, with the date it applies to
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub currency: String,
    pub rate: f64,
    pub as_of: String,
}

/// Something that can answer an exchange-rate query
///
/// `date` is `YYYYMMDD`; `None` asks for the latest published rate.
pub trait RateSource {
    fn query(
        &self,
        currency: &str,
        date: Option<&str>,
    ) -> impl Future<Output = Result<Vec<NbuRate>, RateError>> + Send;
}

/// Validate and upper-case a three-letter currency code
pub fn normalize_currency_code(code: &str) -> Result<String, RateError> {
    let trimmed = code.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(RateError::InvalidCurrency(trimmed.to_string()))
    }
}

/// Format a day the way the NBU `date` parameter expects
pub fn nbu_date(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

/// HTTP client for the NBU exchange endpoint
#[derive(Debug, Clone)]
pub struct NbuClient {
    http: reqwest::Client,
    api_base: String,
}

impl NbuClient {
    pub fn new(config: &RateConfig) -> Result<Self, RateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
        })
    }

    /// Query parameters for a lookup, in the order the service documents
    pub fn query_params(currency: &str, date: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("valcode", currency.to_string())];
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }
        params.push(("json", String::new()));
        params
    }
}

impl RateSource for NbuClient {
    async fn query(&self, currency: &str, date: Option<&str>) -> Result<Vec<NbuRate>, RateError> {
        debug!(currency = %currency, date = ?date, "Querying NBU exchange rate");

        let response = self
            .http
            .get(&self.api_base)
            .query(&Self::query_params(currency, date))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str::<Vec<NbuRate>>(&body).map_err(|e| RateError::Parse(e.to_string()))
    }
}

/// Dated lookup with a single fallback to the latest published rate
#[derive(Debug, Clone)]
pub struct RateFetcher<S> {
    source: S,
}

impl<S: RateSource> RateFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, currency: &str, day: NaiveDate) -> Result<RateSnapshot, RateError> {
        let currency = normalize_currency_code(currency)?;
        let date = nbu_date(day);

        let mut rates = self.source.query(&currency, Some(&date)).await?;
        if rates.is_empty() {
            info!(currency = %currency, date = %date, "No dated rate published, falling back to latest");
            rates = self.source.query(&currency, None).await?;
        }

        let first = rates
            .into_iter()
            .next()
            .ok_or_else(|| RateError::NotFound(currency.clone()))?;

        if !first.rate.is_finite() || first.rate <= 0.0 {
            return Err(RateError::Parse(format!("unusable rate {} for {currency}", first.rate)));
        }

        Ok(RateSnapshot {
            currency,
            rate: first.rate,
            as_of: first.exchangedate,
        })
    }
}

/// Fill the session's `rate` field from a fresh lookup
///
/// On failure the field keeps its previous value and `None` is returned;
/// the error is only logged.
pub async fn refresh_session_rate<S: RateSource>(
    session: &mut CalculatorSession,
    fetcher: &RateFetcher<S>,
    currency: &str,
    day: NaiveDate,
) -> Option<RateSnapshot> {
    match fetcher.fetch(currency, day).await {
        Ok(snapshot) => {
            session.set_value("rate", &snapshot.rate.to_string());
            info!(currency = %snapshot.currency, rate = snapshot.rate, as_of = %snapshot.as_of, "Exchange rate refreshed");
            Some(snapshot)
        }
        Err(e) => {
            warn!(currency = %currency, error = %e, "Exchange rate refresh failed, keeping previous rate");
            None
        }
    }
}
