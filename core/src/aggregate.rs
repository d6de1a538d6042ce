//! The aggregation engine: pure derivations from the current activity and
//! log collections. Every function recomputes from scratch on each call and
//! holds no state between invocations.
//!
//! All month-scoped derivations apply the same two rules before anything
//! else: log entries outside the requested month are dropped (stale backend
//! data must not leak into another month's views), and future days read as
//! not completed even if a record exists for them.

use chrono::NaiveDate;

use crate::calendar::{self, YearMonth};
use crate::index::CompletionIndex;
use crate::model::{Activity, ActivityStat, DailyCount, GridRow, LogEntry, MonthGrid, MonthSummary};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortMode {
    /// Input activity order, as fetched.
    #[default]
    Fetched,
    PercentDesc,
    NameAsc,
}

/// Integer percentage with arithmetic rounding (half away from zero).
/// Shared by activity stats and the month summary so both use the same rule.
fn percent(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

fn month_index(entries: &[LogEntry], month: YearMonth) -> CompletionIndex {
    let scoped: Vec<LogEntry> = entries
        .iter()
        .filter(|entry| month.contains(entry.date))
        .cloned()
        .collect();
    CompletionIndex::build(&scoped)
}

pub fn build_grid(activities: &[Activity], entries: &[LogEntry], month: YearMonth) -> MonthGrid {
    build_grid_at(calendar::today(), activities, entries, month)
}

pub fn build_grid_at(
    today: NaiveDate,
    activities: &[Activity],
    entries: &[LogEntry],
    month: YearMonth,
) -> MonthGrid {
    let index = month_index(entries, month);
    let rows = activities
        .iter()
        .map(|activity| GridRow {
            activity_id: activity.id.clone(),
            name: activity.name.clone(),
            cells: month
                .days()
                .map(|date| {
                    !calendar::is_future_at(today, date) && index.is_completed(&activity.id, date)
                })
                .collect(),
        })
        .collect();

    MonthGrid {
        month,
        days_in_month: month.days_in_month(),
        rows,
    }
}

pub fn compute_activity_stats(
    activities: &[Activity],
    entries: &[LogEntry],
    month: YearMonth,
) -> Vec<ActivityStat> {
    compute_activity_stats_at(calendar::today(), activities, entries, month)
}

/// One stat per activity, in input activity order. Re-order with
/// [`sort_stats`]; the stats themselves are never recomputed per sort.
pub fn compute_activity_stats_at(
    today: NaiveDate,
    activities: &[Activity],
    entries: &[LogEntry],
    month: YearMonth,
) -> Vec<ActivityStat> {
    let index = month_index(entries, month);
    let total = month.days_in_month();
    activities
        .iter()
        .map(|activity| {
            let completed = month
                .days()
                .filter(|date| {
                    !calendar::is_future_at(today, *date)
                        && index.is_completed(&activity.id, *date)
                })
                .count() as u32;
            ActivityStat {
                activity_id: activity.id.clone(),
                name: activity.name.clone(),
                completed,
                total,
                percent: percent(completed, total),
            }
        })
        .collect()
}

/// Pure, side-effect-free re-sort over an already-computed stat collection.
pub fn sort_stats(stats: &mut [ActivityStat], mode: SortMode) {
    match mode {
        SortMode::Fetched => {}
        SortMode::PercentDesc => stats.sort_by(|a, b| b.percent.cmp(&a.percent)),
        SortMode::NameAsc => stats.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

pub fn compute_month_summary(
    activities: &[Activity],
    entries: &[LogEntry],
    month: YearMonth,
) -> MonthSummary {
    compute_month_summary_at(calendar::today(), activities, entries, month)
}

pub fn compute_month_summary_at(
    today: NaiveDate,
    activities: &[Activity],
    entries: &[LogEntry],
    month: YearMonth,
) -> MonthSummary {
    let grid = build_grid_at(today, activities, entries, month);
    let total_cells = grid.total_cells() as u32;
    let completed_cells = grid.completed_cells() as u32;
    MonthSummary {
        total_cells,
        completed_cells,
        completion_rate: percent(completed_cells, total_cells),
    }
}

pub fn compute_daily_counts(entries: &[LogEntry], month: YearMonth) -> Vec<DailyCount> {
    compute_daily_counts_at(calendar::today(), entries, month)
}

/// Completed entries per calendar day, one element per day in ascending
/// order. Future days report 0 like every other month-scoped view.
pub fn compute_daily_counts_at(
    today: NaiveDate,
    entries: &[LogEntry],
    month: YearMonth,
) -> Vec<DailyCount> {
    use chrono::Datelike;

    let mut counts = vec![0u32; month.days_in_month() as usize];
    // Iterate the index, not the raw entries, so duplicate records stay
    // collapsed to their last-wins state instead of counting twice.
    let index = month_index(entries, month);
    for (date, completed) in index.iter().map(|(_, date, completed)| (date, completed)) {
        if completed && !calendar::is_future_at(today, date) {
            counts[date.day0() as usize] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, completed)| DailyCount {
            day: i as u32 + 1,
            completed,
        })
        .collect()
}
