//! Track Visualizer - Terminal UI for live order tracking
//!
//! Shows the tracked order's status card and timeline, recent searches and
//! backend health. Requires a stored session (`swifttrack login`).

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use swifttrack::bin_common::{build_client, load_tracker_config, ConfigType};
use swifttrack::tracking::application::visualizer::{ui, App};
use swifttrack::tracking::infrastructure::SessionStore;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Note: Logging is disabled for TUI - it would corrupt the alternate screen display

    let config = load_tracker_config(ConfigType::Tracker)?;
    let client_id = SessionStore::new(&config.session.path)
        .require_client_id()
        .context("Run `swifttrack login <client-id>` first")?;

    let runtime = tokio::runtime::Runtime::new()?;
    let client = build_client(&config)?;

    let mut app = App::new(runtime.handle().clone(), client, &config, client_id);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short timeout so background updates show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
