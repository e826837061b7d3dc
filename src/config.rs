use crate::task::{parse_time, Category, TaskDraft};
use chrono::Weekday;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::warn;

pub const CONFIG_FILE: &str = "datebook.json";

const DEFAULT_REMINDER_TICK_SECS: u64 = 60;
const DEFAULT_RECURRENCE_TICK_SECS: u64 = 86_400;

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    reminder_tick_secs: Option<u64>,
    recurrence_tick_secs: Option<u64>,
    default_task: Option<RawTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    title: String,
    #[serde(default)]
    category: Category,
    time: Option<String>, // "HH:MM"
    location: Option<String>,
    reminder_lead: Option<i64>,
    image: Option<PathBuf>,
    #[serde(default)]
    recurring: Vec<Weekday>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub reminder_tick: Duration,
    pub recurrence_tick: Duration,
    pub template: Option<TaskDraft>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder_tick: Duration::from_secs(DEFAULT_REMINDER_TICK_SECS),
            recurrence_tick: Duration::from_secs(DEFAULT_RECURRENCE_TICK_SECS),
            template: None,
        }
    }
}

/// Loads the optional config file; missing or unreadable files fall back to
/// defaults. Task state itself is never persisted, this only covers tick
/// intervals and the default-task preset.
pub fn load(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    let raw = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read config, using defaults");
            return Config::default();
        }
    };
    let raw: RawConfig = match serde_json::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(path = %path.display(), %err, "malformed config, using defaults");
            return Config::default();
        }
    };
    Config {
        reminder_tick: Duration::from_secs(
            raw.reminder_tick_secs.unwrap_or(DEFAULT_REMINDER_TICK_SECS),
        ),
        recurrence_tick: Duration::from_secs(
            raw.recurrence_tick_secs
                .unwrap_or(DEFAULT_RECURRENCE_TICK_SECS),
        ),
        template: raw.default_task.and_then(template_from_raw),
    }
}

fn template_from_raw(raw: RawTemplate) -> Option<TaskDraft> {
    if raw.title.trim().is_empty() {
        warn!("default task template has an empty title, dropping the template");
        return None;
    }
    let time = raw.time.and_then(|s| match parse_time(&s) {
        Ok(time) => Some(time),
        Err(err) => {
            warn!(%err, "default task template has a bad time, dropping it");
            None
        }
    });
    Some(TaskDraft {
        title: raw.title,
        category: raw.category,
        time,
        location: raw.location,
        // A lead without a time can never fire.
        reminder_lead: time.and(raw.reminder_lead),
        image: raw.image,
        recurring: raw.recurring,
    })
}
