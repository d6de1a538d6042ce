use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::LogEntry;

/// Lookup structure from (activity id, date) to completion state.
///
/// Built in one pass over the raw entries, so memory stays proportional to
/// the number of records, not to the grid size; the grid's dense view comes
/// from treating absent keys as "not completed" at lookup time.
///
/// Duplicate entries for the same (activity, date) collapse deterministically:
/// the later entry in input order wins. Duplicates are never double-counted.
#[derive(Debug, Default, Clone)]
pub struct CompletionIndex {
    cells: HashMap<(String, NaiveDate), bool>,
}

impl CompletionIndex {
    pub fn build(entries: &[LogEntry]) -> Self {
        let mut cells = HashMap::with_capacity(entries.len());
        for entry in entries {
            cells.insert((entry.activity_id.clone(), entry.date), entry.completed);
        }
        Self { cells }
    }

    /// Absence means "not yet completed", never "unknown".
    pub fn is_completed(&self, activity_id: &str, date: NaiveDate) -> bool {
        self.cells
            .get(&(activity_id.to_string(), date))
            .copied()
            .unwrap_or(false)
    }

    /// Iterate the collapsed cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, bool)> {
        self.cells
            .iter()
            .map(|((activity_id, date), completed)| (activity_id.as_str(), *date, *completed))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn absent_entries_read_as_not_completed() {
        let index = CompletionIndex::build(&[]);
        assert!(!index.is_completed("a1", date("2024-02-10")));
        assert!(index.is_empty());
    }

    #[test]
    fn indexes_entries_by_activity_and_date() {
        let entries = vec![
            LogEntry::new("l1", "a1", date("2024-02-10"), true),
            LogEntry::new("l2", "a1", date("2024-02-11"), false),
            LogEntry::new("l3", "a2", date("2024-02-10"), true),
        ];
        let index = CompletionIndex::build(&entries);
        assert!(index.is_completed("a1", date("2024-02-10")));
        assert!(!index.is_completed("a1", date("2024-02-11")));
        assert!(index.is_completed("a2", date("2024-02-10")));
        assert!(!index.is_completed("a2", date("2024-02-11")));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn duplicate_cell_last_entry_in_input_order_wins() {
        let entries = vec![
            LogEntry::new("l1", "a1", date("2024-02-10"), true),
            LogEntry::new("l2", "a1", date("2024-02-10"), false),
        ];
        let index = CompletionIndex::build(&entries);
        assert!(!index.is_completed("a1", date("2024-02-10")));
        // Collapsed, not double-counted.
        assert_eq!(index.len(), 1);
    }
}
