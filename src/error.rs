use std::io;

use thiserror::Error;

/// Top-level failures of the tutor
#[derive(Debug, Error)]
pub enum AppError {
    #[error("stdin must be a tty")]
    NotATty,

    #[error("failed to enter raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Lessons(#[from] LessonError),
}

/// Problems with the bundled lesson content
#[derive(Debug, Error)]
pub enum LessonError {
    #[error("lesson file {0} is not valid UTF-8")]
    Unreadable(String),

    #[error("unable to parse lesson file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("lesson {0:?} has no lines")]
    Empty(String),
}
