use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::YearMonth;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid calendar month: {0}")]
    InvalidMonth(String),

    #[error("day {day} is out of range for {month}")]
    InvalidDay { month: YearMonth, day: u32 },

    #[error("{date} is in the future; completion can only be toggled for today or past days")]
    FutureDate { date: NaiveDate },

    #[error("a toggle for activity {activity_id} on {date} is already in flight")]
    ToggleInFlight {
        activity_id: String,
        date: NaiveDate,
    },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}
