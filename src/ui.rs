pub mod arcade;
pub mod typing;

use std::io::{self, Write};
use std::rc::Rc;

use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
    Frame, Terminal,
};

use crate::{arcade::ArcadeGame, error::AppError, lesson::Lesson, session::Session};

/// Deep blue of the classic DOS tutor
pub(crate) const BACKGROUND: Color = Color::Indexed(17);

/// Borrowed snapshot of whatever component is active
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Menu {
        lessons: &'a [Rc<Lesson>],
        selected: usize,
    },
    Typing(&'a Session),
    LineComplete(&'a Session),
    Results(&'a Session),
    Arcade(&'a ArcadeGame),
}

/// Turns views into frames. The controller never writes to the terminal
/// directly.
pub trait Renderer {
    fn render(&mut self, view: &View<'_>) -> Result<(), AppError>;
    /// Audible cue for mistakes and escaped invaders
    fn bell(&mut self) -> Result<(), AppError>;
}

/// Ratatui renderer. Frames go to the backend; the bell goes to `bell_out`,
/// which is the real terminal unless a different writer is supplied.
pub struct TerminalRenderer<B: Backend, W: Write = io::Stdout> {
    terminal: Terminal<B>,
    bell_out: W,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B) -> Result<Self, AppError> {
        Self::with_bell(backend, io::stdout())
    }
}

impl<B: Backend, W: Write> TerminalRenderer<B, W> {
    pub fn with_bell(backend: B, bell_out: W) -> Result<Self, AppError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            bell_out,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend, W: Write> Renderer for TerminalRenderer<B, W> {
    fn render(&mut self, view: &View<'_>) -> Result<(), AppError> {
        self.terminal.draw(|f| draw(view, f))?;
        Ok(())
    }

    fn bell(&mut self) -> Result<(), AppError> {
        self.bell_out.write_all(b"\x07")?;
        self.bell_out.flush()?;
        Ok(())
    }
}

pub fn draw(view: &View<'_>, f: &mut Frame) {
    f.render_widget(
        Block::default().style(Style::default().bg(BACKGROUND)),
        f.area(),
    );

    match view {
        View::Menu { lessons, selected } => typing::render_menu(lessons, *selected, f),
        View::Typing(session) => typing::render_typing(session, f),
        View::LineComplete(session) => typing::render_line_complete(session, f),
        View::Results(session) => typing::render_results(session, f),
        View::Arcade(game) => arcade::render_arcade(game, f),
    }
}

pub(crate) fn frame_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::LightCyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(BACKGROUND).fg(Color::White))
}

/// A `width` x `height` rect centered in `area`, clamped to fit
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}
