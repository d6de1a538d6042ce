use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

use crate::backend::traits::TrackerBackend;
use crate::calendar::YearMonth;
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::ingest::{
    self, Ingest, RawActivity, RawLogEntry, validate_activity, validate_log_entry,
};
use crate::model::{Activity, LogEntry};

#[derive(Serialize)]
struct NamePayload<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TogglePayload<'a> {
    activity_id: &'a str,
    date: String,
}

/// REST implementation of the backend collaborator.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|err| CoreError::BackendUnavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::BackendUnavailable(format!(
                "backend answered {status}"
            )));
        }
        Ok(response)
    }

    fn send_json<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request)?
            .json()
            .map_err(|err| CoreError::BackendUnavailable(format!("invalid response body: {err}")))
    }
}

impl TrackerBackend for HttpBackend {
    fn fetch_activities(&self) -> Result<Ingest<Activity>> {
        let raw: Vec<RawActivity> = self.send_json(self.client.get(self.url("/activity")))?;
        let batch = ingest::validate_activities(raw);
        debug!(
            fetched = batch.records.len(),
            skipped = batch.skipped,
            "fetched activities"
        );
        Ok(batch)
    }

    fn fetch_month_logs(&self, month: YearMonth) -> Result<Ingest<LogEntry>> {
        let raw: Vec<RawLogEntry> =
            self.send_json(self.client.get(self.url(&format!("/activity/month/{month}"))))?;
        let batch = ingest::validate_log_entries(raw);
        debug!(
            month = %month,
            fetched = batch.records.len(),
            skipped = batch.skipped,
            "fetched month logs"
        );
        Ok(batch)
    }

    fn create_activity(&self, name: &str) -> Result<Activity> {
        let raw: RawActivity = self.send_json(
            self.client
                .post(self.url("/activity"))
                .json(&NamePayload { name }),
        )?;
        validate_activity(raw)
    }

    fn rename_activity(&self, id: &str, name: &str) -> Result<Activity> {
        let raw: RawActivity = self.send_json(
            self.client
                .put(self.url(&format!("/activity/{id}")))
                .json(&NamePayload { name }),
        )?;
        validate_activity(raw)
    }

    fn delete_activity(&self, id: &str) -> Result<()> {
        self.send(self.client.delete(self.url(&format!("/activity/{id}"))))?;
        Ok(())
    }

    fn toggle_completion(&self, activity_id: &str, date: NaiveDate) -> Result<LogEntry> {
        let raw: RawLogEntry = self.send_json(
            self.client
                .post(self.url("/activity/toggle"))
                .json(&TogglePayload {
                    activity_id,
                    date: date.to_string(),
                }),
        )?;
        validate_log_entry(raw)
    }
}
