use crate::calendar::{self, MonthCell};
use crate::error::PlannerError;
use crate::import::{self, ImportReport};
use crate::recurrence;
use crate::reminder::{ReminderScheduler, ReminderSink};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TaskId};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};

/// The application facade: one shared store behind a single mutex, plus the
/// reminder scheduler and the default-task preset. Clones share state, so
/// the UI thread and the background tick loops each hold one.
///
/// Every mutation rebuilds the reminder job set under the same lock
/// acquisition, so a tick never observes a half-applied change.
#[derive(Clone, Default)]
pub struct Planner {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    store: Mutex<TaskStore>,
    scheduler: Mutex<ReminderScheduler>,
    template: Mutex<Option<TaskDraft>>,
}

impl Planner {
    pub fn new(template: Option<TaskDraft>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(TaskStore::new()),
                scheduler: Mutex::new(ReminderScheduler::new()),
                template: Mutex::new(template),
            }),
        }
    }

    pub fn add_task(&self, date: &str, draft: TaskDraft) -> Result<TaskId, PlannerError> {
        let mut store = self.lock_store();
        let id = store.add(date, draft)?;
        self.rebuild_reminders(&store);
        Ok(id)
    }

    /// Copies the default-task preset onto `date`; `Ok(None)` when no
    /// preset is configured.
    pub fn add_from_template(&self, date: &str) -> Result<Option<TaskId>, PlannerError> {
        let draft = match self.inner.template.lock().expect("planner lock").clone() {
            Some(draft) => draft,
            None => return Ok(None),
        };
        self.add_task(date, draft).map(Some)
    }

    pub fn set_template(&self, template: Option<TaskDraft>) {
        *self.inner.template.lock().expect("planner lock") = template;
    }

    pub fn template(&self) -> Option<TaskDraft> {
        self.inner.template.lock().expect("planner lock").clone()
    }

    pub fn delete_task(&self, date: &str, title: &str) -> Result<usize, PlannerError> {
        let mut store = self.lock_store();
        let removed = store.remove(date, title)?;
        self.rebuild_reminders(&store);
        Ok(removed)
    }

    pub fn delete_task_by_id(&self, date: NaiveDate, id: TaskId) -> Result<usize, PlannerError> {
        let mut store = self.lock_store();
        let removed = store.remove_by_id(date, id)?;
        self.rebuild_reminders(&store);
        Ok(removed)
    }

    pub fn tasks_for_date(&self, date: &str) -> Result<Vec<Task>, PlannerError> {
        self.lock_store().tasks_for(date)
    }

    pub fn tasks_on(&self, date: NaiveDate) -> Vec<Task> {
        self.lock_store().list(date).to_vec()
    }

    pub fn week_grid(&self, day: NaiveDate) -> Vec<(NaiveDate, Vec<Task>)> {
        calendar::week_grid(&self.lock_store(), day)
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Vec<Vec<MonthCell>> {
        calendar::month_grid(&self.lock_store(), year, month)
    }

    pub fn import_text(&self, blob: &str) -> ImportReport {
        let mut store = self.lock_store();
        let report = import::import_text(&mut store, blob);
        self.rebuild_reminders(&store);
        report
    }

    /// Day-granularity tick: materialize upcoming recurring occurrences.
    pub fn project_recurrences(&self, today: NaiveDate) -> usize {
        let mut store = self.lock_store();
        let inserted = recurrence::project_recurrences(&mut store, today);
        if inserted > 0 {
            // Projected copies may carry a time and lead of their own.
            self.rebuild_reminders(&store);
        }
        inserted
    }

    /// Minute-granularity tick: fire any reminders that came due.
    ///
    /// Holds the store lock for the duration so the tick cannot slip into
    /// the window where a mutation has changed the store but not yet
    /// rebuilt the job set. Lock order (store, then scheduler) matches the
    /// mutating paths.
    pub fn reminder_tick(&self, now: NaiveDateTime, sink: &dyn ReminderSink) -> usize {
        let _store = self.lock_store();
        self.inner
            .scheduler
            .lock()
            .expect("planner lock")
            .tick(now, sink)
    }

    fn rebuild_reminders(&self, store: &TaskStore) {
        self.inner
            .scheduler
            .lock()
            .expect("planner lock")
            .rebuild(store);
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, TaskStore> {
        self.inner.store.lock().expect("planner lock")
    }
}
