use crate::calendar::MonthCell;
use crate::planner::Planner;
use crate::reminder::ReminderDue;
use crate::task::{parse_date, parse_time, Category, Task, TaskDraft, TaskId};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::{fs, io};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Week,
    Month,
}

pub struct App {
    pub planner: Planner,
    pub view: ViewMode,
    pub selected: NaiveDate,
    pub status: String,
    pub notices: Vec<String>,
}

impl App {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            view: ViewMode::Week,
            selected: Local::now().date_naive(),
            status: "a: add  t: template  d: delete  v: go to date  i: import  w/m: view  q: quit"
                .to_string(),
            notices: Vec::new(),
        }
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    reminders: &Receiver<ReminderDue>,
) -> io::Result<()> {
    loop {
        while let Ok(due) = reminders.try_recv() {
            app.notices.push(format!(
                "Reminder: {} on {} (at {})",
                due.title,
                due.date,
                due.fire_at.format("%H:%M")
            ));
            if app.notices.len() > 3 {
                app.notices.remove(0);
            }
        }

        terminal.draw(|f| draw(f, app))?;

        // Poll instead of a blocking read so reminder popups show up
        // without a keypress.
        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()), // Quit
                KeyCode::Char('w') => app.view = ViewMode::Week,
                KeyCode::Char('m') => app.view = ViewMode::Month,
                KeyCode::Char('a') => add_task_prompt(app),
                KeyCode::Char('t') => add_from_template(app),
                KeyCode::Char('d') => delete_task_prompt(app),
                KeyCode::Char('v') => go_to_date_prompt(app),
                KeyCode::Char('i') => import_prompt(app),
                KeyCode::Left => app.selected = app.selected - Duration::days(1),
                KeyCode::Right => app.selected = app.selected + Duration::days(1),
                KeyCode::Up => app.selected = app.selected - Duration::days(7),
                KeyCode::Down => app.selected = app.selected + Duration::days(7),
                _ => {}
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(5),
        ])
        .split(f.area());

    match app.view {
        ViewMode::Week => draw_week(f, chunks[0], app),
        ViewMode::Month => draw_month(f, chunks[0], app),
    }
    draw_day_pane(f, chunks[1], app);
    draw_status(f, chunks[2], app);
}

fn draw_week(f: &mut Frame, area: Rect, app: &App) {
    let week = app.planner.week_grid(app.selected);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, 7); 7])
        .split(area);

    for (i, (date, tasks)) in week.iter().enumerate() {
        let items: Vec<ListItem> = tasks.iter().map(|t| ListItem::new(task_line(t))).collect();
        let list = List::new(items).block(
            Block::default()
                .title(format!("{} {}", date.format("%a"), date.format("%m-%d")))
                .borders(Borders::ALL)
                .border_style(if *date == app.selected {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );
        f.render_widget(list, chunks[i]);
    }
}

fn draw_month(f: &mut Frame, area: Rect, app: &App) {
    let grid = app
        .planner
        .month_grid(app.selected.year(), app.selected.month());
    if grid.is_empty() {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, grid.len() as u32); grid.len()])
        .split(area);

    for (row, week) in grid.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, 7); 7])
            .split(rows[row]);
        for (col, cell) in week.iter().enumerate() {
            match cell {
                MonthCell::Blank => {
                    f.render_widget(Block::default().borders(Borders::ALL), cols[col]);
                }
                MonthCell::Day(date, tasks) => {
                    let items: Vec<ListItem> = tasks
                        .iter()
                        .map(|t| ListItem::new(Span::raw(t.title.clone())))
                        .collect();
                    let list = List::new(items).block(
                        Block::default()
                            .title(format!("{}", date.day()))
                            .borders(Borders::ALL)
                            .border_style(if *date == app.selected {
                                Style::default().fg(Color::Cyan)
                            } else {
                                Style::default()
                            }),
                    );
                    f.render_widget(list, cols[col]);
                }
            }
        }
    }
}

fn draw_day_pane(f: &mut Frame, area: Rect, app: &App) {
    let tasks = app.planner.tasks_on(app.selected);
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|t| {
            let mut spans = vec![
                Span::raw(format!("[#{}] ", t.id)),
                Span::styled(&t.title, Style::default().fg(Color::White)),
                Span::raw(format!(" ({})", t.category)),
            ];
            if let Some(time) = t.time {
                spans.push(Span::raw(format!(" at {}", time.format("%H:%M"))));
            }
            if let Some(lead) = t.reminder_lead {
                spans.push(Span::raw(format!(", remind {lead}m before")));
            }
            if let Some(location) = &t.location {
                spans.push(Span::raw(format!(" @ {location}")));
            }
            if !t.recurring.is_empty() {
                let days: Vec<String> = t.recurring.iter().map(|d| d.to_string()).collect();
                spans.push(Span::styled(
                    format!(" [{}]", days.join(",")),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!("Tasks for {}", app.selected))
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(app.status.clone())];
    for notice in &app.notices {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    let block = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(block, area);
}

fn task_line(task: &Task) -> Line<'_> {
    let mut spans = Vec::new();
    if let Some(time) = task.time {
        spans.push(Span::raw(format!("{} ", time.format("%H:%M"))));
    }
    spans.push(Span::styled(
        &task.title,
        Style::default().fg(Color::White),
    ));
    Line::from(spans)
}

fn add_task_prompt(app: &mut App) {
    let Some(date) = prompt("Date (YYYY-MM-DD, empty for selected day)") else {
        return;
    };
    let date = if date.is_empty() {
        app.selected.to_string()
    } else {
        date
    };
    let Some(title) = prompt("Title") else { return };

    let mut draft = TaskDraft::titled(title);
    if let Some(category) = prompt("Category: [g]eneral / [a]ppointment / [t]o-do") {
        draft.category = match category.as_str() {
            "a" => Category::Appointment,
            "t" => Category::ToDo,
            _ => Category::General,
        };
    }
    if let Some(time) = prompt("Time (HH:MM, empty for none)") {
        if !time.is_empty() {
            match parse_time(&time) {
                Ok(time) => draft.time = Some(time),
                Err(err) => {
                    app.status = err.to_string();
                    return;
                }
            }
        }
    }
    if draft.time.is_some() {
        if let Some(lead) = prompt("Reminder lead in minutes (empty for none)") {
            if !lead.is_empty() {
                match lead.parse::<i64>() {
                    Ok(minutes) => draft.reminder_lead = Some(minutes),
                    Err(_) => {
                        app.status = format!("not a number of minutes: {lead}");
                        return;
                    }
                }
            }
        }
    }
    if let Some(location) = prompt("Location (empty for none)") {
        if !location.is_empty() {
            draft.location = Some(location);
        }
    }
    if let Some(days) = prompt("Repeat on weekdays (e.g. Mon,Wed; empty for none)") {
        for token in days.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match token.parse::<Weekday>() {
                Ok(day) => draft.recurring.push(day),
                Err(_) => {
                    app.status = format!("not a weekday: {token}");
                    return;
                }
            }
        }
    }

    match app.planner.add_task(&date, draft) {
        Ok(id) => app.status = format!("Added task #{id} on {date}"),
        Err(err) => app.status = err.to_string(),
    }
}

fn add_from_template(app: &mut App) {
    match app.planner.add_from_template(&app.selected.to_string()) {
        Ok(Some(id)) => app.status = format!("Added task #{id} from template"),
        Ok(None) => app.status = "No default task configured".to_string(),
        Err(err) => app.status = err.to_string(),
    }
}

/// What the delete prompt resolved to: `#<id>` takes the one task shown
/// with that id in the day pane, anything else is a title and removes
/// every match on the selected day.
#[derive(Debug, PartialEq)]
enum DeleteTarget {
    ById(TaskId),
    ByTitle(String),
}

fn delete_target(input: &str) -> Option<DeleteTarget> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(id) = input.strip_prefix('#') {
        if let Ok(id) = id.trim().parse::<TaskId>() {
            return Some(DeleteTarget::ById(id));
        }
    }
    Some(DeleteTarget::ByTitle(input.to_string()))
}

fn delete_task_prompt(app: &mut App) {
    let Some(input) = prompt("Delete: #<id> for one task, or a title (removes every match on the selected day)")
    else {
        return;
    };
    let result = match delete_target(&input) {
        Some(DeleteTarget::ById(id)) => app.planner.delete_task_by_id(app.selected, id),
        Some(DeleteTarget::ByTitle(title)) => {
            app.planner.delete_task(&app.selected.to_string(), &title)
        }
        None => return,
    };
    match result {
        Ok(removed) => app.status = format!("Removed {removed} task(s)"),
        Err(err) => app.status = err.to_string(),
    }
}

fn go_to_date_prompt(app: &mut App) {
    let Some(input) = prompt("Go to date (YYYY-MM-DD)") else {
        return;
    };
    match parse_date(&input) {
        Ok(date) => app.selected = date,
        Err(err) => app.status = err.to_string(),
    }
}

fn import_prompt(app: &mut App) {
    let Some(path) = prompt("Path of a text file with '<date> <title>' lines") else {
        return;
    };
    match fs::read_to_string(&path) {
        Ok(blob) => {
            let report = app.planner.import_text(&blob);
            app.status = format!(
                "Imported {} task(s), skipped {} line(s)",
                report.added, report.skipped
            );
        }
        Err(err) => app.status = format!("could not read {path}: {err}"),
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_prefixed_number_deletes_by_id() {
        assert_eq!(delete_target("#3"), Some(DeleteTarget::ById(3)));
        assert_eq!(delete_target("  # 12  "), Some(DeleteTarget::ById(12)));
    }

    #[test]
    fn anything_else_deletes_by_title() {
        assert_eq!(
            delete_target("Standup"),
            Some(DeleteTarget::ByTitle("Standup".to_string()))
        );
        // A title that merely starts with '#' is still a title.
        assert_eq!(
            delete_target("#1 priority"),
            Some(DeleteTarget::ByTitle("#1 priority".to_string()))
        );
        assert_eq!(delete_target("   "), None);
    }
}
