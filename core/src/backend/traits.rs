use chrono::NaiveDate;

use crate::calendar::YearMonth;
use crate::error::Result;
use crate::ingest::Ingest;
use crate::model::{Activity, LogEntry};

/// The remote collaborator that owns activities and log entries. The client
/// only ever holds read-through copies of what these operations return.
///
/// Fetches return validated batches: malformed records have already been
/// dropped at the ingestion boundary, with the skip count alongside.
pub trait TrackerBackend {
    fn fetch_activities(&self) -> Result<Ingest<Activity>>;
    fn fetch_month_logs(&self, month: YearMonth) -> Result<Ingest<LogEntry>>;
    fn create_activity(&self, name: &str) -> Result<Activity>;
    fn rename_activity(&self, id: &str, name: &str) -> Result<Activity>;
    fn delete_activity(&self, id: &str) -> Result<()>;
    /// Flip the completion state of (activity, date); returns the entry the
    /// backend now holds. Callers must treat the local view as stale until
    /// they refetch the month's logs.
    fn toggle_completion(&self, activity_id: &str, date: NaiveDate) -> Result<LogEntry>;
}
