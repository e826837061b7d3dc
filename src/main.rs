use chrono::Local;
use crossbeam_channel::unbounded;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datebook::config::{self, CONFIG_FILE};
use datebook::planner::Planner;
use datebook::ticker;
use datebook::ui::{self, App};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::Path;
use std::sync::Arc;
use std::{fs, io};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "datebook.log";

fn main() -> anyhow::Result<()> {
    // The terminal belongs to the TUI, so logs go to a file.
    let log = fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("datebook=debug")),
        )
        .with_writer(Arc::new(log))
        .with_ansi(false)
        .init();

    let cfg = config::load(Path::new(CONFIG_FILE));
    let planner = Planner::new(cfg.template.clone());

    // Catch up recurring tasks before the first frame renders.
    planner.project_recurrences(Local::now().date_naive());

    let (reminder_tx, reminder_rx) = unbounded();
    let (shutdown_tx, shutdown_rx) = unbounded::<()>();

    let reminder_loop = {
        let planner = planner.clone();
        ticker::spawn("reminder-tick", cfg.reminder_tick, shutdown_rx.clone(), move || {
            planner.reminder_tick(Local::now().naive_local(), &reminder_tx);
        })?
    };
    let recurrence_loop = {
        let planner = planner.clone();
        ticker::spawn("recurrence-tick", cfg.recurrence_tick, shutdown_rx, move || {
            planner.project_recurrences(Local::now().date_naive());
        })?
    };

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(planner);
    let result = ui::run_app(&mut terminal, &mut app, &reminder_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Dropping the sender stops both tick loops.
    drop(shutdown_tx);
    let _ = reminder_loop.join();
    let _ = recurrence_loop.join();

    if let Err(err) = result {
        eprintln!("{:?}", err);
    }
    Ok(())
}
