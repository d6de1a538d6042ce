//! Validation boundary between the backend's JSON record shapes and the
//! typed models the rest of the crate works with. Malformed records are
//! skipped and counted, never silently coerced; one bad record does not
//! abort the batch.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::model::{Activity, LogEntry};

/// Activity record as the backend serializes it.
#[derive(Deserialize, Debug, Clone)]
pub struct RawActivity {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Reference-only activity object embedded in populated log entries.
#[derive(Deserialize, Debug, Clone)]
pub struct RawActivityRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
}

/// Log entry record as the backend serializes it. The backend may send the
/// activity reference either flat (`activityId`) or populated (`activity`
/// object); both are accepted.
#[derive(Deserialize, Debug, Clone)]
pub struct RawLogEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(rename = "activityId")]
    pub activity_id: Option<String>,
    pub activity: Option<RawActivityRef>,
    pub date: Option<String>,
    pub completed: Option<bool>,
}

/// A validated batch plus the number of records that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct Ingest<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

pub fn validate_activity(raw: RawActivity) -> Result<Activity> {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CoreError::MalformedRecord("activity is missing an id".into()))?;
    let name = raw
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| CoreError::MalformedRecord(format!("activity {id} has no name")))?;
    Ok(Activity { id, name })
}

pub fn validate_log_entry(raw: RawLogEntry) -> Result<LogEntry> {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CoreError::MalformedRecord("log entry is missing an id".into()))?;
    let activity_id = raw
        .activity_id
        .or(raw.activity.and_then(|a| a.id))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CoreError::MalformedRecord(format!("log entry {id} has no activity reference"))
        })?;
    let date_str = raw
        .date
        .ok_or_else(|| CoreError::MalformedRecord(format!("log entry {id} has no date")))?;
    let date: NaiveDate = date_str.parse().map_err(|_| {
        CoreError::MalformedRecord(format!("log entry {id} has unparseable date '{date_str}'"))
    })?;
    let completed = raw.completed.ok_or_else(|| {
        CoreError::MalformedRecord(format!("log entry {id} has no completed flag"))
    })?;
    Ok(LogEntry {
        id,
        activity_id,
        date,
        completed,
    })
}

pub fn validate_activities(raw: Vec<RawActivity>) -> Ingest<Activity> {
    validate_batch(raw, validate_activity)
}

pub fn validate_log_entries(raw: Vec<RawLogEntry>) -> Ingest<LogEntry> {
    validate_batch(raw, validate_log_entry)
}

fn validate_batch<R, T>(raw: Vec<R>, validate: impl Fn(R) -> Result<T>) -> Ingest<T> {
    let mut out = Ingest {
        records: Vec::with_capacity(raw.len()),
        skipped: 0,
    };
    for record in raw {
        match validate(record) {
            Ok(valid) => out.records.push(valid),
            Err(err) => {
                warn!("skipping record: {err}");
                out.skipped += 1;
            }
        }
    }
    out
}
