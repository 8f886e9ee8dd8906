//! dutylog - Duty Report Console
//!
//! Runs the attendance report bot against a terminal console standing in for
//! the chat app. Finished reports are appended to a CSV file and announced to
//! the configured group chat.

use std::io;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use dutylog::application::{App, ChatInfo, CommitPipeline, FormEngine, SystemClock};
use dutylog::domain::UserId;
use dutylog::infrastructure::{build_notifier, init_logging, resolve_config_path, CsvRecordSink, Settings, CONFIG_ENV};
use dutylog::presentation::{render_ui, InputHandler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let settings = Settings::load(&config_path)?;
    init_logging(&settings.logging)?;
    info!(config = %config_path.display(), csv = %settings.storage.csv_path.display(), "starting dutylog");

    let notifier = build_notifier(&settings.notification)?;
    let sink = CsvRecordSink::new(settings.storage.csv_path.clone());
    let engine = FormEngine::new(CommitPipeline::new(Box::new(sink), notifier), Box::new(SystemClock));

    let console = &settings.console;
    let chat = ChatInfo {
        id: console.chat_id,
        kind: console.chat_kind.clone(),
        title: console.chat_title.clone(),
    };
    let mut app = App::new(engine, UserId(console.user_id), chat);
    app.note(format!("Reports are appended to {}.", settings.storage.csv_path.display()));
    if settings.notification.credentials().is_none() {
        app.note("No bot token or chat id configured; group notifications are only logged.");
    }
    app.note("Type /start to begin, F1 for help.");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "console terminated");
        println!("{err:?}");
    }
    info!("dutylog stopped");

    Ok(())
}

/// Draws the console and feeds key presses to it until the user quits.
///
/// Events are handled one at a time on this thread, so each user's
/// session sees them strictly in order.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') | KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
