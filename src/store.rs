use crate::error::PlannerError;
use crate::task::{parse_date, Task, TaskDraft, TaskId};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Date-indexed task storage. A date key exists only while its list is
/// non-empty; insertion order within a date is the display order.
#[derive(Debug)]
pub struct TaskStore {
    tasks: BTreeMap<NaiveDate, Vec<Task>>,
    next_id: TaskId,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, date: &str, draft: TaskDraft) -> Result<TaskId, PlannerError> {
        if draft.title.trim().is_empty() {
            return Err(PlannerError::EmptyRequiredField("title"));
        }
        let date = parse_date(date)?;
        Ok(self.add_on(date, draft))
    }

    /// Parsed-date variant, used by recurrence projection and text import.
    pub fn add_on(&mut self, date: NaiveDate, draft: TaskDraft) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let task = draft.into_task(id);
        debug!(%date, id, title = %task.title, "task added");
        self.tasks.entry(date).or_default().push(task);
        id
    }

    /// Removes every task on `date` whose title matches. Same-named tasks go
    /// together; callers wanting a single task use [`TaskStore::remove_by_id`].
    pub fn remove(&mut self, date: &str, title: &str) -> Result<usize, PlannerError> {
        let date = parse_date(date)?;
        self.remove_where(date, title.to_string(), |t| t.title == title)
    }

    pub fn remove_by_id(&mut self, date: NaiveDate, id: TaskId) -> Result<usize, PlannerError> {
        self.remove_where(date, format!("#{id}"), |t| t.id == id)
    }

    fn remove_where(
        &mut self,
        date: NaiveDate,
        what: String,
        pred: impl Fn(&Task) -> bool,
    ) -> Result<usize, PlannerError> {
        let Some(list) = self.tasks.get_mut(&date) else {
            return Err(PlannerError::TaskNotFound { date, what });
        };
        let before = list.len();
        list.retain(|t| !pred(t));
        let removed = before - list.len();
        if list.is_empty() {
            self.tasks.remove(&date);
        }
        if removed == 0 {
            return Err(PlannerError::TaskNotFound { date, what });
        }
        debug!(%date, removed, "task(s) removed");
        Ok(removed)
    }

    pub fn list(&self, date: NaiveDate) -> &[Task] {
        self.tasks.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tasks_for(&self, date: &str) -> Result<Vec<Task>, PlannerError> {
        Ok(self.list(parse_date(date)?).to_vec())
    }

    pub fn dates_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.tasks.range(start..=end).map(|(d, _)| *d).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Task])> {
        self.tasks.iter().map(|(d, list)| (*d, list.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Category;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn add_appends_in_order() {
        let mut store = TaskStore::new();
        store.add("2024-03-04", TaskDraft::titled("first")).unwrap();
        store.add("2024-03-04", TaskDraft::titled("second")).unwrap();
        let titles: Vec<_> = store
            .list(date("2024-03-04"))
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn add_rejects_bad_date_and_leaves_store_unchanged() {
        let mut store = TaskStore::new();
        let err = store.add("not-a-date", TaskDraft::titled("x")).unwrap_err();
        assert_eq!(err, PlannerError::InvalidDateFormat("not-a-date".to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut store = TaskStore::new();
        let err = store.add("2024-03-04", TaskDraft::titled("  ")).unwrap_err();
        assert_eq!(err, PlannerError::EmptyRequiredField("title"));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut store = TaskStore::new();
        let a = store.add("2024-03-04", TaskDraft::titled("a")).unwrap();
        let b = store.add("2024-03-05", TaskDraft::titled("b")).unwrap();
        store.remove("2024-03-04", "a").unwrap();
        let c = store.add("2024-03-04", TaskDraft::titled("c")).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn removing_last_task_drops_the_date_key() {
        let mut store = TaskStore::new();
        store.add("2024-03-04", TaskDraft::titled("only")).unwrap();
        assert_eq!(store.remove("2024-03-04", "only").unwrap(), 1);
        assert!(store.list(date("2024-03-04")).is_empty());
        assert!(store
            .dates_in_range(date("2024-01-01"), date("2024-12-31"))
            .is_empty());
    }

    #[test]
    fn remove_by_title_takes_all_same_named_tasks() {
        let mut store = TaskStore::new();
        store.add("2024-03-04", TaskDraft::titled("Standup")).unwrap();
        store.add("2024-03-04", TaskDraft::titled("Lunch")).unwrap();
        store.add("2024-03-04", TaskDraft::titled("Standup")).unwrap();
        assert_eq!(store.remove("2024-03-04", "Standup").unwrap(), 2);
        let titles: Vec<_> = store
            .list(date("2024-03-04"))
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["Lunch"]);
    }

    #[test]
    fn remove_by_id_takes_exactly_one_among_same_named() {
        let mut store = TaskStore::new();
        let first = store.add("2024-03-04", TaskDraft::titled("Standup")).unwrap();
        store.add("2024-03-04", TaskDraft::titled("Standup")).unwrap();
        assert_eq!(store.remove_by_id(date("2024-03-04"), first).unwrap(), 1);
        let left = store.list(date("2024-03-04"));
        assert_eq!(left.len(), 1);
        assert_ne!(left[0].id, first);
    }

    #[test]
    fn remove_reports_not_found() {
        let mut store = TaskStore::new();
        assert!(matches!(
            store.remove("2024-03-04", "ghost"),
            Err(PlannerError::TaskNotFound { .. })
        ));
        store.add("2024-03-04", TaskDraft::titled("real")).unwrap();
        assert!(matches!(
            store.remove("2024-03-04", "ghost"),
            Err(PlannerError::TaskNotFound { .. })
        ));
        assert_eq!(store.list(date("2024-03-04")).len(), 1);
    }

    #[test]
    fn dates_in_range_is_ordered_and_inclusive() {
        let mut store = TaskStore::new();
        store.add("2024-03-10", TaskDraft::titled("c")).unwrap();
        store.add("2024-03-01", TaskDraft::titled("a")).unwrap();
        store.add("2024-03-05", TaskDraft::titled("b")).unwrap();
        store.add("2024-04-01", TaskDraft::titled("d")).unwrap();
        assert_eq!(
            store.dates_in_range(date("2024-03-01"), date("2024-03-10")),
            vec![date("2024-03-01"), date("2024-03-05"), date("2024-03-10")]
        );
    }

    #[test]
    fn drafts_keep_their_fields() {
        let mut store = TaskStore::new();
        let mut draft = TaskDraft::titled("Dentist");
        draft.category = Category::Appointment;
        draft.time = crate::task::parse_time("14:30").ok();
        draft.reminder_lead = Some(30);
        draft.location = Some("Main St".to_string());
        store.add("2024-03-04", draft).unwrap();
        let task = &store.list(date("2024-03-04"))[0];
        assert_eq!(task.category, Category::Appointment);
        assert_eq!(task.reminder_lead, Some(30));
        assert_eq!(task.location.as_deref(), Some("Main St"));
    }
}
