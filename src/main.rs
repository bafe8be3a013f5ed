use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use keytutor::{logging, Settings};
use tracing::error;

/// classic terminal typing tutor with graded lessons and an arcade mode
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A classic terminal typing tutor: practice lessons line by line with live speed and accuracy, get a graded score report, or shoot falling letters in the Space Invaders arcade mode."
)]
pub struct Cli {
    /// arcade clock period in milliseconds
    #[clap(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(10..))]
    tick_ms: u64,

    /// do not ring the terminal bell on mistakes
    #[clap(short = 'q', long)]
    quiet: bool,

    /// menu entry to highlight at startup (1-based)
    #[clap(short = 'l', long, value_parser = clap::value_parser!(u64).range(1..))]
    lesson: Option<u64>,

    /// write logs to this file (level set via RUST_LOG, default info)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn to_settings(&self) -> Settings {
        Settings {
            tick: Duration::from_millis(self.tick_ms),
            bell: !self.quiet,
            initial_selection: self.lesson.map_or(0, |n| n as usize - 1),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_file.as_deref()) {
        eprintln!("Error: unable to open log file: {e}");
        return ExitCode::FAILURE;
    }

    match keytutor::run(cli.to_settings()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "exiting with failure");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
