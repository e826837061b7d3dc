use crate::store::TaskStore;
use crate::task::TaskDraft;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, info};

/// Projects recurring tasks forward: for every stored task with a non-empty
/// recurring-weekday set, materializes an occurrence on the next matching
/// weekday strictly after `today`, skipping dates that already hold a task
/// with the same title.
///
/// Only tasks dated on or before `today` act as sources; projected copies
/// become sources themselves once the reference date catches up with them.
/// Running twice with the same reference date is a no-op the second time.
pub fn project_recurrences(store: &mut TaskStore, today: NaiveDate) -> usize {
    let mut pending: Vec<(NaiveDate, TaskDraft)> = Vec::new();
    for (date, tasks) in store.iter() {
        if date > today {
            break;
        }
        for task in tasks.iter().filter(|t| !t.recurring.is_empty()) {
            for &weekday in &task.recurring {
                let offset = (weekday.num_days_from_monday() + 7
                    - date.weekday().num_days_from_monday())
                    % 7;
                let next = date + Duration::days(offset as i64);
                if next <= today {
                    continue;
                }
                let already = store.list(next).iter().any(|t| t.title == task.title)
                    || pending
                        .iter()
                        .any(|(d, t)| *d == next && t.title == task.title);
                if already {
                    debug!(%next, title = %task.title, "occurrence exists, skipping");
                    continue;
                }
                pending.push((next, task.draft()));
            }
        }
    }

    let inserted = pending.len();
    for (date, draft) in pending {
        store.add_on(date, draft);
    }
    if inserted > 0 {
        info!(inserted, %today, "recurrence projection inserted occurrences");
    }
    inserted
}
