use crate::store::TaskStore;
use crate::task::TaskId;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::info;

/// A reminder that came due, delivered to the notification sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDue {
    pub date: NaiveDate,
    pub task_id: TaskId,
    pub title: String,
    pub fire_at: NaiveDateTime,
}

pub trait ReminderSink {
    fn on_reminder_due(&self, due: &ReminderDue);
}

/// Lets the tick loop hand reminders straight to a channel; the UI drains
/// the receiving end, so delivery never blocks the loop.
impl ReminderSink for crossbeam_channel::Sender<ReminderDue> {
    fn on_reminder_due(&self, due: &ReminderDue) {
        let _ = self.send(due.clone());
    }
}

type JobKey = (NaiveDate, TaskId, NaiveDateTime);

#[derive(Debug, Clone)]
struct ReminderJob {
    date: NaiveDate,
    task_id: TaskId,
    title: String,
    fire_at: NaiveDateTime,
}

impl ReminderJob {
    fn key(&self) -> JobKey {
        (self.date, self.task_id, self.fire_at)
    }
}

/// Derives a fire time for every task carrying both a time-of-day and a
/// reminder lead. The job list is rebuilt wholesale on every store mutation;
/// the fired-key set survives rebuilds so a job fires exactly once even when
/// mutations land between ticks.
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    jobs: Vec<ReminderJob>,
    fired: HashSet<JobKey>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, store: &TaskStore) {
        self.jobs.clear();
        for (date, tasks) in store.iter() {
            for task in tasks {
                let (Some(time), Some(lead)) = (task.time, task.reminder_lead) else {
                    continue;
                };
                self.jobs.push(ReminderJob {
                    date,
                    task_id: task.id,
                    title: task.title.clone(),
                    fire_at: date.and_time(time) - Duration::minutes(lead),
                });
            }
        }
        // Keys for deleted tasks would otherwise pile up forever.
        let live: HashSet<JobKey> = self.jobs.iter().map(ReminderJob::key).collect();
        self.fired.retain(|key| live.contains(key));
    }

    /// Fires every job whose time has been reached and not yet notified.
    /// Returns the number of notifications sent.
    pub fn tick(&mut self, now: NaiveDateTime, sink: &dyn ReminderSink) -> usize {
        let mut count = 0;
        for job in &self.jobs {
            if job.fire_at > now || self.fired.contains(&job.key()) {
                continue;
            }
            self.fired.insert(job.key());
            let due = ReminderDue {
                date: job.date,
                task_id: job.task_id,
                title: job.title.clone(),
                fire_at: job.fire_at,
            };
            info!(date = %due.date, title = %due.title, fire_at = %due.fire_at, "reminder due");
            sink.on_reminder_due(&due);
            count += 1;
        }
        count
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}
