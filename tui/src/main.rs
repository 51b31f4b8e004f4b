//! Vibedeck entry point
//!
//! Terminal setup/teardown around the App event loop. Mouse capture is
//! required: pointer movement drives the card tilt effect.

use std::io;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use vibedeck_tui::App;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let mut app = App::new().await?;

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal).await;
    restore_terminal(&mut terminal)?;

    if let Some(action) = app.last_action() {
        println!("ACTION DISPATCHED: {action}");
    }

    result
}

/// Log to the file named by `VIBEDECK_LOG`, filtered by `RUST_LOG`.
///
/// Logging stays off without the variable - the alternate screen and a
/// stderr subscriber don't mix.
fn init_tracing() -> Result<()> {
    if let Ok(path) = std::env::var("VIBEDECK_LOG") {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
