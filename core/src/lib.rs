pub mod aggregate;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod index;
pub mod ingest;
pub mod model;
pub mod service;

pub use aggregate::{
    SortMode, build_grid, compute_activity_stats, compute_daily_counts, compute_month_summary,
    sort_stats,
};
pub use backend::{HttpBackend, TrackerBackend};
pub use calendar::YearMonth;
pub use config::Config;
pub use coordinator::{MutationCoordinator, ToggleReceipt};
pub use error::{CoreError, Result};
pub use index::CompletionIndex;
pub use model::{Activity, ActivityStat, DailyCount, LogEntry, MonthGrid, MonthSummary};
pub use service::TrackerService;
