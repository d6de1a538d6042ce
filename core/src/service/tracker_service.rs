use tracing::info;

use crate::aggregate::{self, SortMode};
use crate::backend::TrackerBackend;
use crate::calendar::YearMonth;
use crate::coordinator::MutationCoordinator;
use crate::error::Result;
use crate::model::{Activity, ActivityStat, DailyCount, LogEntry, MonthGrid, MonthSummary};

use chrono::NaiveDate;

/// One tracking session: the viewed month plus read-through copies of the
/// backend's activity and log collections. Every view is derived fresh from
/// those copies; nothing derived is ever cached or patched in place.
///
/// Mutations write through to the backend and refetch; a failed mutation
/// leaves the copies, and therefore every view, exactly as they were.
pub struct TrackerService<B: TrackerBackend> {
    backend: B,
    coordinator: MutationCoordinator,
    month: YearMonth,
    activities: Vec<Activity>,
    logs: Vec<LogEntry>,
    skipped_records: usize,
}

impl<B: TrackerBackend> TrackerService<B> {
    /// Creates the session and performs the initial fetch.
    pub fn connect(backend: B, month: YearMonth) -> Result<Self> {
        let mut service = Self {
            backend,
            coordinator: MutationCoordinator::new(),
            month,
            activities: Vec::new(),
            logs: Vec::new(),
            skipped_records: 0,
        };
        service.refresh()?;
        Ok(service)
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Records the backend sent but the ingestion boundary had to skip, as
    /// of the last refresh.
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    pub fn refresh(&mut self) -> Result<()> {
        let activities = self.backend.fetch_activities()?;
        let logs = self.backend.fetch_month_logs(self.month)?;
        self.skipped_records = activities.skipped + logs.skipped;
        self.activities = activities.records;
        self.logs = logs.records;
        info!(
            month = %self.month,
            activities = self.activities.len(),
            logs = self.logs.len(),
            skipped = self.skipped_records,
            "session refreshed"
        );
        Ok(())
    }

    fn refresh_logs(&mut self) -> Result<()> {
        let logs = self.backend.fetch_month_logs(self.month)?;
        self.skipped_records = logs.skipped;
        self.logs = logs.records;
        Ok(())
    }

    pub fn set_month(&mut self, month: YearMonth) -> Result<()> {
        self.month = month;
        self.refresh_logs()
    }

    pub fn month_grid(&self) -> MonthGrid {
        aggregate::build_grid(&self.activities, &self.logs, self.month)
    }

    pub fn activity_stats(&self, sort: SortMode) -> Vec<ActivityStat> {
        let mut stats = aggregate::compute_activity_stats(&self.activities, &self.logs, self.month);
        aggregate::sort_stats(&mut stats, sort);
        stats
    }

    pub fn month_summary(&self) -> MonthSummary {
        aggregate::compute_month_summary(&self.activities, &self.logs, self.month)
    }

    pub fn daily_counts(&self) -> Vec<DailyCount> {
        aggregate::compute_daily_counts(&self.logs, self.month)
    }

    /// Toggle one cell and refetch the authoritative log collection. The
    /// optimistic entry in the receipt is discarded on purpose: the refetch
    /// is what the views are rebuilt from.
    pub fn request_toggle(&mut self, activity_id: &str, date: NaiveDate) -> Result<()> {
        self.coordinator.toggle(&self.backend, activity_id, date)?;
        self.refresh_logs()
    }

    pub fn add_activity(&mut self, name: &str) -> Result<Activity> {
        let created = self.backend.create_activity(name)?;
        self.refresh()?;
        Ok(created)
    }

    pub fn rename_activity(&mut self, id: &str, name: &str) -> Result<Activity> {
        let renamed = self.backend.rename_activity(id, name)?;
        self.refresh()?;
        Ok(renamed)
    }

    pub fn delete_activity(&mut self, id: &str) -> Result<()> {
        self.backend.delete_activity(id)?;
        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::CoreError;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// In-memory stand-in for the REST backend, mirroring its toggle
    /// semantics: toggling a missing entry creates it completed, toggling an
    /// existing one flips it.
    #[derive(Default)]
    struct MockBackend {
        activities: RefCell<Vec<Activity>>,
        logs: RefCell<Vec<LogEntry>>,
        next_id: RefCell<u32>,
        fail_mutations: RefCell<bool>,
    }

    impl MockBackend {
        fn with_activities(names: &[&str]) -> Self {
            let backend = Self::default();
            for name in names {
                let id = backend.mint_id();
                backend
                    .activities
                    .borrow_mut()
                    .push(Activity::new(id, *name));
            }
            backend
        }

        fn mint_id(&self) -> String {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            format!("id{}", *next)
        }

        fn check_available(&self) -> Result<()> {
            if *self.fail_mutations.borrow() {
                Err(CoreError::BackendUnavailable("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    impl TrackerBackend for MockBackend {
        fn fetch_activities(&self) -> Result<crate::ingest::Ingest<Activity>> {
            Ok(crate::ingest::Ingest {
                records: self.activities.borrow().clone(),
                skipped: 0,
            })
        }

        fn fetch_month_logs(&self, month: YearMonth) -> Result<crate::ingest::Ingest<LogEntry>> {
            Ok(crate::ingest::Ingest {
                records: self
                    .logs
                    .borrow()
                    .iter()
                    .filter(|log| month.contains(log.date))
                    .cloned()
                    .collect(),
                skipped: 0,
            })
        }

        fn create_activity(&self, name: &str) -> Result<Activity> {
            self.check_available()?;
            let activity = Activity::new(self.mint_id(), name);
            self.activities.borrow_mut().push(activity.clone());
            Ok(activity)
        }

        fn rename_activity(&self, id: &str, name: &str) -> Result<Activity> {
            self.check_available()?;
            let mut activities = self.activities.borrow_mut();
            let activity = activities
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| CoreError::BackendUnavailable("backend answered 404".into()))?;
            activity.name = name.to_string();
            Ok(activity.clone())
        }

        fn delete_activity(&self, id: &str) -> Result<()> {
            self.check_available()?;
            self.activities.borrow_mut().retain(|a| a.id != id);
            Ok(())
        }

        fn toggle_completion(&self, activity_id: &str, date: NaiveDate) -> Result<LogEntry> {
            self.check_available()?;
            let mut logs = self.logs.borrow_mut();
            if let Some(log) = logs
                .iter_mut()
                .find(|log| log.activity_id == activity_id && log.date == date)
            {
                log.completed = !log.completed;
                Ok(log.clone())
            } else {
                let entry = LogEntry::new(self.mint_id(), activity_id, date, true);
                logs.push(entry.clone());
                Ok(entry)
            }
        }
    }

    #[test]
    fn toggle_round_trip_restores_the_grid() {
        let backend = MockBackend::with_activities(&["Read"]);
        let month: YearMonth = "2024-02".parse().unwrap();
        let mut service = TrackerService::connect(backend, month).unwrap();
        let activity_id = service.activities()[0].id.clone();
        let target = date("2024-02-10");

        let before = service.month_grid();
        assert!(!before.is_completed(&activity_id, 10));

        service.request_toggle(&activity_id, target).unwrap();
        assert!(service.month_grid().is_completed(&activity_id, 10));
        assert_eq!(service.month_summary().completed_cells, 1);

        service.request_toggle(&activity_id, target).unwrap();
        assert_eq!(service.month_grid(), before);
    }

    #[test]
    fn failed_toggle_leaves_views_unchanged() {
        let backend = MockBackend::with_activities(&["Read"]);
        let month: YearMonth = "2024-02".parse().unwrap();
        let mut service = TrackerService::connect(backend, month).unwrap();
        let activity_id = service.activities()[0].id.clone();
        let target = date("2024-02-10");
        service.request_toggle(&activity_id, target).unwrap();
        let before_grid = service.month_grid();
        let before_summary = service.month_summary();

        *service.backend.fail_mutations.borrow_mut() = true;
        let result = service.request_toggle(&activity_id, target);
        assert!(matches!(result, Err(CoreError::BackendUnavailable(_))));

        assert_eq!(service.month_grid(), before_grid);
        assert_eq!(service.month_summary(), before_summary);
    }

    #[test]
    fn views_follow_the_viewed_month() {
        let backend = MockBackend::with_activities(&["Read"]);
        let february: YearMonth = "2024-02".parse().unwrap();
        let mut service = TrackerService::connect(backend, february).unwrap();
        let activity_id = service.activities()[0].id.clone();
        service.request_toggle(&activity_id, date("2024-02-10")).unwrap();

        service.set_month(february.next()).unwrap();
        assert_eq!(service.month_summary().completed_cells, 0);
        assert_eq!(service.month_grid().days_in_month, 31);

        service.set_month(february).unwrap();
        assert_eq!(service.month_summary().completed_cells, 1);
    }

    #[test]
    fn activity_crud_refreshes_the_session() {
        let backend = MockBackend::default();
        let month: YearMonth = "2024-02".parse().unwrap();
        let mut service = TrackerService::connect(backend, month).unwrap();
        assert!(service.activities().is_empty());

        let created = service.add_activity("Read").unwrap();
        assert_eq!(service.activities().len(), 1);

        service.rename_activity(&created.id, "Read books").unwrap();
        assert_eq!(service.activities()[0].name, "Read books");
        let stats = service.activity_stats(SortMode::Fetched);
        assert_eq!(stats[0].name, "Read books");

        service.delete_activity(&created.id).unwrap();
        assert!(service.activities().is_empty());
        assert_eq!(service.month_summary().total_cells, 0);
    }
}
