//! Client for the Open-Meteo historical weather archive.

use crate::types::records::DailyWeatherRecord;
use crate::weather_data::error::FetchError;
use crate::weather_data::request::WeatherRequest;
use crate::weather_data::response::{error_reason, ArchiveResponse, DAILY_VARIABLES};
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Fetches daily weather from the archive with a per-attempt timeout and
/// a bounded number of retries for transient failures.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

#[bon]
impl ArchiveClient {
    /// Creates a client. Every setting is optional.
    ///
    /// * `.base_url(..)`: archive endpoint. Defaults to [`DEFAULT_ARCHIVE_URL`].
    /// * `.timeout(..)`: limit for one attempt, body included. Defaults to 30 seconds.
    /// * `.max_retries(..)`: extra attempts after a transient failure. Defaults to 2.
    /// * `.retry_backoff(..)`: wait before retry `n` is `n * retry_backoff`. Defaults to 500 ms.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use weather_tourism::ArchiveClient;
    ///
    /// let client = ArchiveClient::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .max_retries(0)
    ///     .build();
    /// assert_eq!(client.max_retries(), 0);
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
        max_retries: Option<u32>,
        retry_backoff: Option<Duration>,
    ) -> Self {
        ArchiveClient {
            http: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff: retry_backoff.unwrap_or(DEFAULT_RETRY_BACKOFF),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetches one record per day in `request`, in the order the archive returns them.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`]. Transient failures are retried first; once retries are used up the
    /// last failure is returned wrapped in [`FetchError::RetriesExhausted`].
    pub async fn fetch_daily(
        &self,
        request: &WeatherRequest,
    ) -> Result<Vec<DailyWeatherRecord>, FetchError> {
        request.validate()?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(request).await {
                Ok(records) => {
                    info!(
                        "Fetched {} daily records for {} ({} to {})",
                        records.len(),
                        request.location,
                        request.start,
                        request.end
                    );
                    return Ok(records);
                }
                Err(e) if e.is_retryable() && attempt <= self.max_retries => {
                    let delay = self.retry_backoff * attempt;
                    warn!(
                        "Archive request failed: {}. Retry {}/{} in {:?}",
                        e, attempt, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if attempt > 1 => {
                    return Err(FetchError::RetriesExhausted {
                        url: self.base_url.clone(),
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(
        &self,
        request: &WeatherRequest,
    ) -> Result<Vec<DailyWeatherRecord>, FetchError> {
        let url = &self.base_url;
        let query = [
            ("latitude", request.location.lat().to_string()),
            ("longitude", request.location.lon().to_string()),
            ("start_date", request.start.format("%Y-%m-%d").to_string()),
            ("end_date", request.end.format("%Y-%m-%d").to_string()),
            ("daily", DAILY_VARIABLES.join(",")),
            ("timezone", request.timezone.clone()),
        ];
        debug!("Requesting {} with {:?}", url, query);

        let response = self
            .http
            .get(url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let reason = error_reason(&body);
            warn!("HTTP error for {}: {} ({})", url, status, reason);
            return Err(FetchError::HttpStatus {
                url: url.clone(),
                status,
                reason,
            });
        }

        let parsed: ArchiveResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::JsonDecode {
                url: url.clone(),
                source: e,
            })?;
        parsed.into_records()
    }

    fn request_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: self.base_url.clone(),
                timeout: self.timeout,
                source: e,
            }
        } else {
            FetchError::NetworkRequest(self.base_url.clone(), e)
        }
    }
}

impl Default for ArchiveClient {
    fn default() -> Self {
        ArchiveClient::builder().build()
    }
}
