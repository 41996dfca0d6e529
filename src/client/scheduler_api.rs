use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    models::{Calendar, Doctor, ScheduleStatus, ScheduleSummary, YearMonth},
    AppConfig, AppError, AppResult,
};

/// The REST service that stores calendars and generates schedules
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Store `calendar`, generate its schedule and wait for it to finish.
    /// Returns the location where the schedule can be read.
    async fn generate_schedule(&self, calendar: &Calendar) -> AppResult<String>;

    /// Fetch a generated schedule, `None` when the month has none
    async fn get_schedule(&self, year_month: YearMonth) -> AppResult<Option<Value>>;

    /// Month, year and status of every known schedule
    async fn list_schedules(&self) -> AppResult<Vec<ScheduleSummary>>;

    /// Mark a generated schedule as final, `None` when the month has none
    async fn confirm_schedule(&self, year_month: YearMonth) -> AppResult<Option<Value>>;

    /// Doctors that may be picked as wanted or unwanted staff
    async fn available_doctors(&self) -> AppResult<Vec<Doctor>>;
}

/// A collection as the scheduler API returns it, either a bare array or a
/// HAL document with the items under `_embedded.<rel>`
#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Plain(Vec<T>),
    Hal {
        #[serde(rename = "_embedded", default = "HashMap::new")]
        embedded: HashMap<String, Vec<T>>,
    },
}

impl<T> Collection<T> {
    fn into_items(self, rel: &str) -> Vec<T> {
        match self {
            Collection::Plain(items) => items,
            Collection::Hal { mut embedded } => embedded.remove(rel).unwrap_or_default(),
        }
    }
}

/// Location of a schedule in this service
pub fn schedule_href(year_month: YearMonth) -> String {
    format!("/api/schedules/{}", year_month)
}

pub struct SchedulerApi {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl SchedulerApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.scheduler_api_url.clone(),
            poll_interval: config.poll_interval,
            poll_attempts: config.poll_attempts,
        }
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str, rel: &str) -> AppResult<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);
        let call = format!("GET {}", path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, &call))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body, call, "Scheduler API returned error");
            return Err(AppError::Upstream(format!("{}: {} - {}", call, status, body)));
        }

        let collection: Collection<T> = response.json().await.map_err(|e| {
            tracing::error!(error = %e, call, "Failed to parse collection");
            AppError::Upstream(format!("Failed to parse {}: {}", rel, e))
        })?;

        Ok(collection.into_items(rel))
    }

    /// POST the calendar; a month that already has one answers 400, in which
    /// case the existing calendar is replaced with a PUT
    async fn persist_calendar(&self, calendar: &Calendar, year_month: YearMonth) -> AppResult<()> {
        let url = format!("{}/calendars", self.base_url);
        tracing::info!(%year_month, "Posting calendar to scheduler API");

        let response = self
            .client
            .post(&url)
            .json(calendar)
            .send()
            .await
            .map_err(|e| transport_error(e, "POST calendar"))?;

        if response.status() == StatusCode::BAD_REQUEST {
            tracing::info!(%year_month, "Calendar already exists, replacing it");
            let url = format!("{}/calendars/{}", self.base_url, year_month);
            let response = self
                .client
                .put(&url)
                .json(calendar)
                .send()
                .await
                .map_err(|e| transport_error(e, "PUT calendar"))?;
            return ensure_success(response, "PUT calendar").await;
        }

        ensure_success(response, "POST calendar").await
    }

    async fn request_generation(&self, year_month: YearMonth) -> AppResult<()> {
        let url = format!("{}/schedules/{}", self.base_url, year_month);
        tracing::info!(%year_month, "Requesting schedule generation");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, "POST schedule"))?;

        ensure_success(response, "POST schedule").await
    }

    async fn await_generation(&self, year_month: YearMonth) -> AppResult<()> {
        let url = format!("{}/schedules/{}", self.base_url, year_month);

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            tracing::debug!(%year_month, attempt, "Polling schedule status");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| transport_error(e, "GET schedule"))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(status = %status, body, "Scheduler API returned error while polling");
                return Err(AppError::Upstream(format!("GET schedule: {} - {}", status, body)));
            }

            let schedule: ScheduleStatus = response.json().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to parse schedule status");
                AppError::Upstream(format!("Failed to parse schedule status: {}", e))
            })?;

            if !schedule.is_being_generated() {
                tracing::info!(%year_month, status = %schedule.status, "Schedule generated");
                return Ok(());
            }
        }

        tracing::error!(%year_month, attempts = self.poll_attempts, "Schedule generation did not finish");
        Err(AppError::Upstream(format!(
            "Schedule for {} was still being generated after {} attempts",
            year_month, self.poll_attempts
        )))
    }
}

#[async_trait]
impl ScheduleBackend for SchedulerApi {
    async fn generate_schedule(&self, calendar: &Calendar) -> AppResult<String> {
        let year_month = YearMonth::new(calendar.year, calendar.month).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid calendar month {}-{}", calendar.year, calendar.month))
        })?;

        self.persist_calendar(calendar, year_month).await?;
        self.request_generation(year_month).await?;
        self.await_generation(year_month).await?;

        Ok(schedule_href(year_month))
    }

    async fn get_schedule(&self, year_month: YearMonth) -> AppResult<Option<Value>> {
        let url = format!("{}/schedules/{}", self.base_url, year_month);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, "GET schedule"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body, "Scheduler API returned error");
            return Err(AppError::Upstream(format!("GET schedule: {} - {}", status, body)));
        }

        let schedule = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse schedule");
            AppError::Upstream(format!("Failed to parse schedule: {}", e))
        })?;

        Ok(Some(schedule))
    }

    async fn list_schedules(&self) -> AppResult<Vec<ScheduleSummary>> {
        tracing::info!("Requesting schedule list");
        self.get_collection("schedules", "schedules").await
    }

    async fn confirm_schedule(&self, year_month: YearMonth) -> AppResult<Option<Value>> {
        let url = format!("{}/schedules/{}/confirm", self.base_url, year_month);
        tracing::info!(%year_month, "Confirming schedule");

        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, "PUT schedule confirmation"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_success(response, "PUT schedule confirmation").await?;

        self.get_schedule(year_month).await
    }

    async fn available_doctors(&self) -> AppResult<Vec<Doctor>> {
        let doctors: Vec<Doctor> = self.get_collection("doctors", "doctors").await?;
        Ok(doctors.into_iter().filter(Doctor::is_available).collect())
    }
}

fn transport_error(e: reqwest::Error, call: &str) -> AppError {
    tracing::error!(error = %e, call, "Failed to call scheduler API");
    AppError::Upstream(format!("{}: {}", call, e))
}

async fn ensure_success(response: reqwest::Response, call: &str) -> AppResult<()> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(status = %status, body, call, "Scheduler API returned error");
    Err(AppError::Upstream(format!("{}: {} - {}", call, status, body)))
}
