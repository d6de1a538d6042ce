//! Write-through coordination for completion toggles.
//!
//! The coordinator never merges a toggle into any local view. On success it
//! hands back a receipt and the caller is expected to refetch the month's
//! authoritative logs and rebuild every derived view; on failure the views
//! last computed stay valid as-is.

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::backend::TrackerBackend;
use crate::calendar;
use crate::error::{CoreError, Result};
use crate::model::LogEntry;

/// Proof that the backend accepted a toggle. Holding one means the cached
/// log collection is stale until refetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleReceipt {
    pub entry: LogEntry,
}

#[derive(Debug, Default)]
pub struct MutationCoordinator {
    // Cells with an unresolved toggle request. RefCell suffices: execution
    // is single-threaded and event-driven per the concurrency model.
    in_flight: RefCell<HashSet<(String, NaiveDate)>>,
}

impl MutationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle<B: TrackerBackend>(
        &self,
        backend: &B,
        activity_id: &str,
        date: NaiveDate,
    ) -> Result<ToggleReceipt> {
        self.toggle_at(calendar::today(), backend, activity_id, date)
    }

    /// The future-date check is defense in depth: the presentation layer
    /// must not offer future cells at all, and this rejects them anyway.
    pub fn toggle_at<B: TrackerBackend>(
        &self,
        today: NaiveDate,
        backend: &B,
        activity_id: &str,
        date: NaiveDate,
    ) -> Result<ToggleReceipt> {
        if calendar::is_future_at(today, date) {
            return Err(CoreError::FutureDate { date });
        }

        let key = (activity_id.to_string(), date);
        if !self.in_flight.borrow_mut().insert(key.clone()) {
            return Err(CoreError::ToggleInFlight {
                activity_id: activity_id.to_string(),
                date,
            });
        }

        debug!(activity_id, %date, "dispatching toggle");
        let result = backend.toggle_completion(activity_id, date);
        // Clear the guard on failure too, so the cell stays toggleable.
        self.in_flight.borrow_mut().remove(&key);

        result.map(|entry| ToggleReceipt { entry })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::calendar::YearMonth;
    use crate::ingest::Ingest;
    use crate::model::Activity;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    struct StubBackend {
        fail: bool,
    }

    impl TrackerBackend for StubBackend {
        fn fetch_activities(&self) -> Result<Ingest<Activity>> {
            unimplemented!()
        }
        fn fetch_month_logs(&self, _month: YearMonth) -> Result<Ingest<LogEntry>> {
            unimplemented!()
        }
        fn create_activity(&self, _name: &str) -> Result<Activity> {
            unimplemented!()
        }
        fn rename_activity(&self, _id: &str, _name: &str) -> Result<Activity> {
            unimplemented!()
        }
        fn delete_activity(&self, _id: &str) -> Result<()> {
            unimplemented!()
        }
        fn toggle_completion(&self, activity_id: &str, date: NaiveDate) -> Result<LogEntry> {
            if self.fail {
                return Err(CoreError::BackendUnavailable("connection refused".into()));
            }
            Ok(LogEntry::new("l1", activity_id, date, true))
        }
    }

    /// Backend that re-enters the coordinator while its own request is
    /// "in flight", the way a rapid double-click would.
    struct ReentrantBackend {
        coordinator: Rc<MutationCoordinator>,
    }

    impl TrackerBackend for ReentrantBackend {
        fn fetch_activities(&self) -> Result<Ingest<Activity>> {
            unimplemented!()
        }
        fn fetch_month_logs(&self, _month: YearMonth) -> Result<Ingest<LogEntry>> {
            unimplemented!()
        }
        fn create_activity(&self, _name: &str) -> Result<Activity> {
            unimplemented!()
        }
        fn rename_activity(&self, _id: &str, _name: &str) -> Result<Activity> {
            unimplemented!()
        }
        fn delete_activity(&self, _id: &str) -> Result<()> {
            unimplemented!()
        }
        fn toggle_completion(&self, activity_id: &str, date: NaiveDate) -> Result<LogEntry> {
            let second = self.coordinator.toggle_at(
                date,
                &StubBackend { fail: false },
                activity_id,
                date,
            );
            assert!(matches!(second, Err(CoreError::ToggleInFlight { .. })));
            Ok(LogEntry::new("l1", activity_id, date, true))
        }
    }

    #[test]
    fn future_dates_are_rejected_before_dispatch() {
        let coordinator = MutationCoordinator::new();
        let today = date("2024-02-10");
        let tomorrow = date("2024-02-11");
        let result = coordinator.toggle_at(today, &StubBackend { fail: false }, "a1", tomorrow);
        assert_eq!(result, Err(CoreError::FutureDate { date: tomorrow }));
    }

    #[test]
    fn today_is_toggleable() {
        let coordinator = MutationCoordinator::new();
        let today = date("2024-02-10");
        let receipt = coordinator
            .toggle_at(today, &StubBackend { fail: false }, "a1", today)
            .unwrap();
        assert_eq!(receipt.entry.activity_id, "a1");
        assert_eq!(receipt.entry.date, today);
    }

    #[test]
    fn second_toggle_on_an_in_flight_cell_is_rejected() {
        let coordinator = Rc::new(MutationCoordinator::new());
        let backend = ReentrantBackend {
            coordinator: Rc::clone(&coordinator),
        };
        let today = date("2024-02-10");
        // The nested assertion inside the backend proves the rejection
        // happens while the first request is unresolved.
        coordinator
            .toggle_at(today, &backend, "a1", today)
            .unwrap();
    }

    #[test]
    fn guard_clears_after_success_and_failure() {
        let coordinator = MutationCoordinator::new();
        let today = date("2024-02-10");

        coordinator
            .toggle_at(today, &StubBackend { fail: false }, "a1", today)
            .unwrap();
        coordinator
            .toggle_at(today, &StubBackend { fail: false }, "a1", today)
            .unwrap();

        let failed = coordinator.toggle_at(today, &StubBackend { fail: true }, "a1", today);
        assert!(matches!(failed, Err(CoreError::BackendUnavailable(_))));
        coordinator
            .toggle_at(today, &StubBackend { fail: false }, "a1", today)
            .unwrap();
    }
}
