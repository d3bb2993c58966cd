use std::io;
use std::panic;

use anyhow::Context;
use chrono::Local;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{read, Event};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use super::draw::draw_session;
use super::events::{detail_command, grid_command};
use super::state::{Flow, Session, ViewMode};
use crate::config::Options;
use crate::error::GitheatError;
use crate::heat::load_history;

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        install_panic_hook(restore_terminal);
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Run `cleanup` before the current panic hook.
fn install_panic_hook(cleanup: fn()) {
    let original = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        cleanup();
        original(info);
    }));
}

pub fn run(options: &Options) -> anyhow::Result<()> {
    let history = load_history(options)?;
    let title = history.path.display().to_string();
    let mut session = Session::new(history.index, options, Local::now().date_naive(), title);

    let (width, _) = terminal::size().context("Failed to read terminal size")?;
    if !session.fits(width) {
        return Err(GitheatError::TerminalTooNarrow {
            required: session.graph_width(),
            available: usize::from(width),
        }
        .into());
    }

    let _guard = TerminalGuard::enter().context("Failed to set up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    info!("interactive session started");

    loop {
        let size = terminal.size()?;
        session.layout(size.width, size.height);
        terminal.draw(|f| draw_session(f.buffer_mut(), &session))?;

        let Event::Key(key) = read()? else {
            continue;
        };
        let in_detail = matches!(session.mode(), ViewMode::Detail(_));
        let flow = if in_detail {
            detail_command(key).map(|cmd| session.handle_detail(cmd))
        } else {
            grid_command(key).map(|cmd| session.handle(cmd))
        };
        if flow == Some(Flow::Quit) {
            break;
        }
    }

    info!("interactive session ended");
    Ok(())
}
