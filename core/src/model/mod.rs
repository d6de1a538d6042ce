pub mod activity;
pub mod grid;
pub mod log_entry;
pub mod stats;

pub use activity::Activity;
pub use grid::{GridRow, MonthGrid};
pub use log_entry::LogEntry;
pub use stats::{ActivityStat, DailyCount, MonthSummary};
