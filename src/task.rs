use crate::error::PlannerError;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub type TaskId = u64;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    General,
    Appointment,
    #[serde(rename = "To-Do")]
    ToDo,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::General => write!(f, "General"),
            Category::Appointment => write!(f, "Appointment"),
            Category::ToDo => write!(f, "To-Do"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub category: Category,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub reminder_lead: Option<i64>, // minutes before `time`
    pub image: Option<PathBuf>,     // opaque, only carried for display
    pub recurring: Vec<Weekday>,    // treated as a set, deduplicated on add
}

/// Caller-supplied task fields; the store assigns the id.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub category: Category,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub reminder_lead: Option<i64>,
    pub image: Option<PathBuf>,
    pub recurring: Vec<Weekday>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn into_task(self, id: TaskId) -> Task {
        let mut recurring = Vec::with_capacity(self.recurring.len());
        for day in self.recurring {
            if !recurring.contains(&day) {
                recurring.push(day);
            }
        }
        Task {
            id,
            title: self.title,
            category: self.category,
            time: self.time,
            location: self.location,
            reminder_lead: self.reminder_lead,
            image: self.image,
            recurring,
        }
    }
}

impl Task {
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            category: self.category,
            time: self.time,
            location: self.location.clone(),
            reminder_lead: self.reminder_lead,
            image: self.image.clone(),
            recurring: self.recurring.clone(),
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::InvalidDateFormat(s.trim().to_string()))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, PlannerError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| PlannerError::InvalidTimeFormat(s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert!(parse_date("2024-03-04").is_ok());
        assert_eq!(
            parse_date("04/03/2024"),
            Err(PlannerError::InvalidDateFormat("04/03/2024".to_string()))
        );
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn parses_hh_mm_times_only() {
        assert!(parse_time("09:00").is_ok());
        assert!(parse_time("9 am").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn draft_dedups_recurring_weekdays() {
        let mut draft = TaskDraft::titled("Gym");
        draft.recurring = vec![Weekday::Mon, Weekday::Fri, Weekday::Mon];
        let task = draft.into_task(1);
        assert_eq!(task.recurring, vec![Weekday::Mon, Weekday::Fri]);
    }
}
