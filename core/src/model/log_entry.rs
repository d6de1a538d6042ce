use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (activity, calendar date) completion fact as held by the backend.
/// References its activity by id only; a deleted activity simply orphans
/// its entries from the client's point of view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub activity_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl LogEntry {
    pub fn new(
        id: impl Into<String>,
        activity_id: impl Into<String>,
        date: NaiveDate,
        completed: bool,
    ) -> Self {
        Self {
            id: id.into(),
            activity_id: activity_id.into(),
            date,
            completed,
        }
    }
}
