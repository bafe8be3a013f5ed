// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod arcade;
pub mod error;
pub mod key;
pub mod lesson;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod terminal;
pub mod ui;

use std::io;

use ratatui::backend::CrosstermBackend;
use tracing::info;

pub use crate::app::{App, Settings};
pub use crate::error::AppError;

/// Take over the terminal and run the tutor until the user quits
pub fn run(settings: Settings) -> Result<(), AppError> {
    let lessons = lesson::builtin_lessons()?;
    info!(lessons = lessons.len(), "loaded lessons");

    // declared first so it is dropped last, after the renderer
    let _guard = terminal::TerminalGuard::acquire()?;
    let mut renderer = ui::TerminalRenderer::new(CrosstermBackend::new(io::stdout()))?;
    let input = runtime::InputChannel::spawn(raw_stdin()?)?;

    let mut app = App::new(lessons, settings);
    app::run_loop(&mut app, &input, &mut renderer)
}

/// Unbuffered handle on stdin so that one read is one key chunk
#[cfg(unix)]
fn raw_stdin() -> io::Result<std::fs::File> {
    use std::os::fd::AsFd;

    Ok(std::fs::File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
fn raw_stdin() -> io::Result<std::fs::File> {
    use std::os::windows::io::AsHandle;

    Ok(std::fs::File::from(io::stdin().as_handle().try_clone_to_owned()?))
}
