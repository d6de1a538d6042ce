use serde::Serialize;

/// Per-activity completion statistics for one month.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActivityStat {
    pub activity_id: String,
    pub name: String,
    /// Days of the month marked completed.
    pub completed: u32,
    /// Days tracked, i.e. days in the month.
    pub total: u32,
    /// round(completed / total * 100), 0 when total is 0.
    pub percent: u32,
}

/// Whole-month roll-up consumed by the summary cards and the pie chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub total_cells: u32,
    pub completed_cells: u32,
    pub completion_rate: u32,
}

impl MonthSummary {
    pub fn missed_cells(&self) -> u32 {
        self.total_cells - self.completed_cells
    }
}

/// One bar of the per-day completion chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub day: u32,
    pub completed: u32,
}
