use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio_util::sync::CancellationToken;

use super::app::App;
use super::rendering::ui;
use crate::executor::RenameResult;
use crate::rename_engine::RenamePlanEntry;

/// Show the rename plan and apply it once confirmed.
///
/// Returns the per-file results; empty if the user quit without renaming.
pub async fn run_preview(
    title: String,
    directory: PathBuf,
    plan: Vec<RenamePlanEntry>,
    cancel: CancellationToken,
) -> anyhow::Result<Vec<RenameResult>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(title, directory, plan, cancel);
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(app.into_results())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if app.is_processing() {
            app.process_next();
        }

        // Ctrl-C outside the terminal cancels through the shared token.
        if app.cancel.is_cancelled() && !app.finished {
            if app.is_processing() {
                app.cancel_processing();
            } else {
                return Ok(());
            }
        }

        if !event::poll(Duration::from_millis(100))? {
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc if app.show_help => app.toggle_help(),
            _ if is_quit_key(&key) => {
                if app.quit_or_stop() {
                    return Ok(());
                }
            }
            KeyCode::Char('h') => app.toggle_help(),
            KeyCode::Char('p') => app.toggle_preview(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter => app.start_processing(),
            _ => {}
        }
    }
}

/// `q`, `Esc` and `Ctrl-C`; raw mode delivers Ctrl-C as a key instead of a signal.
fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
