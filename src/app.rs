use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use crate::arcade::{self, ArcadeGame};
use crate::error::AppError;
use crate::key::Key;
use crate::lesson::Lesson;
use crate::runtime::{FixedTicker, KeySource, Runner, TutorEvent};
use crate::session::{Outcome, Session};
use crate::ui::{Renderer, View};

/// Runtime knobs injected into the controller
#[derive(Debug, Clone)]
pub struct Settings {
    /// Period of the arcade clock
    pub tick: Duration,
    /// Ring the terminal bell on mistakes and escaped invaders
    pub bell: bool,
    /// Menu entry highlighted at startup
    pub initial_selection: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick: arcade::DEFAULT_TICK,
            bell: true,
            initial_selection: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AppState {
    Menu,
    Typing,
    LineComplete,
    Results,
    Arcade,
}

/// What the event loop should do after a key or tick was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing visible changed
    Ignore,
    Redraw,
    /// Redraw and play the audible cue
    Bell,
    StartArcade,
    LeaveArcade,
    Quit,
}

/// How the arcade sub-loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcadeExit {
    ReturnToMenu,
    Quit,
}

/// Top-level state machine. Owns every session and game; mutated only from
/// the consumer loop.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub selected: usize,
    pub session: Option<Session>,
    pub arcade: Option<ArcadeGame>,
    lessons: Vec<Rc<Lesson>>,
    settings: Settings,
}

impl App {
    pub fn new(lessons: Vec<Lesson>, settings: Settings) -> Self {
        let lessons: Vec<Rc<Lesson>> = lessons.into_iter().map(Rc::new).collect();
        // lessons plus the arcade entry
        let selected = settings.initial_selection.min(lessons.len());

        Self {
            state: AppState::Menu,
            selected,
            session: None,
            arcade: None,
            lessons,
            settings,
        }
    }

    /// Number of menu entries: every lesson plus the arcade
    pub fn menu_len(&self) -> usize {
        self.lessons.len() + 1
    }

    pub fn arcade_selected(&self) -> bool {
        self.selected == self.lessons.len()
    }

    pub fn view(&self) -> View<'_> {
        match (self.state, &self.session, &self.arcade) {
            (AppState::Typing, Some(s), _) => View::Typing(s),
            (AppState::LineComplete, Some(s), _) => View::LineComplete(s),
            (AppState::Results, Some(s), _) => View::Results(s),
            (AppState::Arcade, _, Some(game)) => View::Arcade(game),
            _ => View::Menu {
                lessons: &self.lessons,
                selected: self.selected,
            },
        }
    }

    fn set_state(&mut self, state: AppState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "state change");
        }
        self.state = state;
    }

    fn start_lesson(&mut self, lesson: Rc<Lesson>) {
        info!(lesson = lesson.name(), "starting lesson");
        self.session = Some(Session::new(lesson));
        self.set_state(AppState::Typing);
    }

    fn to_menu(&mut self) -> Command {
        self.session = None;
        self.arcade = None;
        self.set_state(AppState::Menu);
        Command::Redraw
    }

    /// Dispatch one key to whichever component is active
    pub fn handle_key(&mut self, key: Key) -> Command {
        if key == Key::CtrlC {
            info!(state = %self.state, "ctrl-c, quitting");
            return Command::Quit;
        }

        match self.state {
            AppState::Menu => self.on_menu_key(key),
            AppState::Typing => self.on_typing_key(key),
            AppState::LineComplete => self.on_line_complete_key(key),
            AppState::Results => self.on_results_key(key),
            AppState::Arcade => self.on_arcade_key(key),
        }
    }

    fn on_menu_key(&mut self, key: Key) -> Command {
        match key {
            Key::Up => {
                self.selected = self.selected.saturating_sub(1);
                Command::Redraw
            }
            Key::Down => {
                if self.selected + 1 < self.menu_len() {
                    self.selected += 1;
                }
                Command::Redraw
            }
            Key::Enter => {
                if self.arcade_selected() {
                    self.start_arcade()
                } else {
                    let lesson = Rc::clone(&self.lessons[self.selected]);
                    self.start_lesson(lesson);
                    Command::Redraw
                }
            }
            Key::Escape | Key::Char('q') | Key::Char('Q') => Command::Quit,
            Key::Char(c) => match c.to_digit(10) {
                Some(n) if n >= 1 && (n as usize) <= self.menu_len() => {
                    self.selected = n as usize - 1;
                    Command::Redraw
                }
                _ => Command::Ignore,
            },
            _ => Command::Ignore,
        }
    }

    fn on_typing_key(&mut self, key: Key) -> Command {
        let Some(session) = self.session.as_mut() else {
            return self.to_menu();
        };

        match key {
            Key::Char(c) => {
                let outcome = session.add_rune(c);
                // an empty line is already full, so this commits it on any key
                let finished = session.finish_line();
                if let Some(stats) = finished {
                    info!(
                        line = session.line_index() + 1,
                        cpm = stats.cpm(),
                        accuracy = stats.accuracy(),
                        "line complete"
                    );
                    self.set_state(AppState::LineComplete);
                }
                match (outcome, finished) {
                    (Some(Outcome::Incorrect), _) => Command::Bell,
                    (Some(Outcome::Correct), _) | (None, Some(_)) => Command::Redraw,
                    (None, None) => Command::Ignore,
                }
            }
            Key::Backspace => {
                session.backspace();
                Command::Redraw
            }
            Key::Escape => self.to_menu(),
            _ => Command::Ignore,
        }
    }

    fn on_line_complete_key(&mut self, key: Key) -> Command {
        if key.is_none() {
            return Command::Ignore;
        }
        let Some(session) = self.session.as_mut() else {
            return self.to_menu();
        };

        if session.all_done() {
            let total = session.total_stats();
            info!(
                lesson = session.lesson().name(),
                cpm = total.cpm(),
                accuracy = total.accuracy(),
                "lesson complete"
            );
            self.set_state(AppState::Results);
        } else {
            session.advance_line();
            self.set_state(AppState::Typing);
        }
        Command::Redraw
    }

    fn on_results_key(&mut self, key: Key) -> Command {
        match key {
            Key::Char('r') | Key::Char('R') => match self.session.as_ref() {
                Some(session) => {
                    let lesson = Rc::clone(session.lesson());
                    self.start_lesson(lesson);
                    Command::Redraw
                }
                None => self.to_menu(),
            },
            Key::Char('m') | Key::Char('M') | Key::Escape => self.to_menu(),
            Key::Char('q') | Key::Char('Q') => Command::Quit,
            _ => Command::Ignore,
        }
    }

    fn start_arcade(&mut self) -> Command {
        info!("starting arcade");
        self.session = None;
        self.arcade = Some(ArcadeGame::new());
        self.set_state(AppState::Arcade);
        Command::StartArcade
    }

    fn on_arcade_key(&mut self, key: Key) -> Command {
        let Some(over) = self.arcade.as_ref().map(ArcadeGame::is_over) else {
            self.to_menu();
            return Command::LeaveArcade;
        };

        if key == Key::Escape {
            self.to_menu();
            return Command::LeaveArcade;
        }

        if over {
            return match key {
                Key::Char('r') | Key::Char('R') => {
                    info!("restarting arcade");
                    self.arcade = Some(ArcadeGame::new());
                    Command::Redraw
                }
                Key::Char('m') | Key::Char('M') => {
                    self.to_menu();
                    Command::LeaveArcade
                }
                Key::Char('q') | Key::Char('Q') => Command::Quit,
                _ => Command::Ignore,
            };
        }

        let Some(game) = self.arcade.as_mut() else {
            return Command::Ignore;
        };
        match key {
            Key::Char(c) => {
                if game.try_shoot(c.to_ascii_lowercase()) {
                    Command::Redraw
                } else {
                    Command::Ignore
                }
            }
            _ => Command::Ignore,
        }
    }

    /// Advance the arcade clock by one tick
    pub fn on_tick(&mut self) -> Command {
        let Some(game) = self.arcade.as_mut() else {
            return Command::Ignore;
        };
        if game.is_over() {
            return Command::Ignore;
        }

        let report = game.update();
        if report.escaped > 0 {
            Command::Bell
        } else {
            Command::Redraw
        }
    }
}

fn present<R: Renderer + ?Sized>(
    app: &App,
    renderer: &mut R,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Ignore => Ok(()),
        Command::Bell => {
            if app.settings.bell {
                renderer.bell()?;
            }
            renderer.render(&app.view())
        }
        _ => renderer.render(&app.view()),
    }
}

/// Main consumer loop. Waits on the key source indefinitely and returns on
/// quit, or when the key source is gone.
pub fn run_loop<S, R>(app: &mut App, source: &S, renderer: &mut R) -> Result<(), AppError>
where
    S: KeySource + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.render(&app.view())?;

    loop {
        let Some(key) = source.recv() else {
            info!("input closed, quitting");
            return Ok(());
        };

        match app.handle_key(key) {
            Command::Quit => return Ok(()),
            Command::StartArcade => {
                renderer.render(&app.view())?;
                if run_arcade(app, source, renderer)? == ArcadeExit::Quit {
                    return Ok(());
                }
                renderer.render(&app.view())?;
            }
            command => present(app, renderer, command)?,
        }
    }
}

/// Arcade sub-loop: the clock and the key source are merged into one event
/// stream here, so ticks and shots never interleave mid-update.
pub fn run_arcade<S, R>(app: &mut App, source: &S, renderer: &mut R) -> Result<ArcadeExit, AppError>
where
    S: KeySource + ?Sized,
    R: Renderer + ?Sized,
{
    let mut runner = Runner::new(source, FixedTicker::new(app.settings.tick));

    loop {
        let command = match runner.step() {
            None => {
                info!("input closed during arcade, quitting");
                return Ok(ArcadeExit::Quit);
            }
            Some(TutorEvent::Tick) => app.on_tick(),
            Some(TutorEvent::Key(key)) => app.handle_key(key),
        };

        match command {
            Command::Quit => return Ok(ArcadeExit::Quit),
            Command::LeaveArcade => return Ok(ArcadeExit::ReturnToMenu),
            command => present(app, renderer, command)?,
        }
    }
}
