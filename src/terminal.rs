use std::io::{self, stdin, Write};
use std::sync::OnceLock;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use tracing::{debug, info};

use crate::error::AppError;

/// Owns raw mode for the lifetime of the app.
///
/// Dropping the guard restores the terminal, so every return path (including
/// `?` propagation) leaves the terminal usable. Panics go through a hook that
/// does the same.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self, AppError> {
        if !stdin().is_tty() {
            return Err(AppError::NotATty);
        }

        enable_raw_mode().map_err(AppError::RawMode)?;
        install_panic_hook();

        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            restore();
            return Err(AppError::Io(e));
        }

        info!("terminal raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
        info!("terminal restored");
    }
}

/// Best-effort restore; errors are ignored since there is nowhere left to
/// report them.
fn restore() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
        debug!("panic hook installed");
    });
}
