use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlannerError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTimeFormat(String),
    #[error("no matching task on {date}: {what}")]
    TaskNotFound { date: NaiveDate, what: String },
    #[error("{0} must not be empty")]
    EmptyRequiredField(&'static str),
}
