use serde::Serialize;

use crate::calendar::YearMonth;

/// One activity's row of the month grid: `cells[d - 1]` is the completion
/// state for day `d`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GridRow {
    pub activity_id: String,
    pub name: String,
    pub cells: Vec<bool>,
}

/// The dense activity × day completion matrix for one month. Derived fresh
/// from the current activity and log collections on every build, never
/// mutated in place.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub days_in_month: u32,
    pub rows: Vec<GridRow>,
}

impl MonthGrid {
    pub fn total_cells(&self) -> usize {
        self.rows.len() * self.days_in_month as usize
    }

    pub fn completed_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|cell| **cell).count())
            .sum()
    }

    /// Completion state of one cell; unknown activities and out-of-range
    /// days read as not completed.
    pub fn is_completed(&self, activity_id: &str, day: u32) -> bool {
        self.rows
            .iter()
            .find(|row| row.activity_id == activity_id)
            .and_then(|row| row.cells.get(day.checked_sub(1)? as usize))
            .copied()
            .unwrap_or(false)
    }
}
