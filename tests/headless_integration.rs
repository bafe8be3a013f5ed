use std::sync::mpsc;
use std::time::Duration;

use keytutor::app::{self, App, AppState, ArcadeExit, Settings};
use keytutor::key::Key;
use keytutor::lesson::Lesson;
use keytutor::runtime::QUEUE_CAPACITY;
use keytutor::ui::{Renderer, View};
use keytutor::AppError;

/// Renderer that records which views were drawn and how often the bell rang
#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<String>,
    bells: usize,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &View<'_>) -> Result<(), AppError> {
        let tag = match view {
            View::Menu { .. } => "menu",
            View::Typing(_) => "typing",
            View::LineComplete(_) => "line-complete",
            View::Results(_) => "results",
            View::Arcade(game) if game.is_over() => "game-over",
            View::Arcade(_) => "arcade",
        };
        self.frames.push(tag.to_string());
        Ok(())
    }

    fn bell(&mut self) -> Result<(), AppError> {
        self.bells += 1;
        Ok(())
    }
}

fn lessons() -> Vec<Lesson> {
    vec![Lesson::new("pair", vec!["hi".into(), "ok".into()]).unwrap()]
}

fn keys_for(s: &str) -> Vec<Key> {
    s.chars().map(Key::Char).collect()
}

/// Feed `keys` through a bounded channel from a producer thread, like the
/// real input reader does.
fn scripted(keys: Vec<Key>) -> mpsc::Receiver<Key> {
    let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);
    std::thread::spawn(move || {
        for key in keys {
            if tx.send(key).is_err() {
                break;
            }
        }
    });
    rx
}

// Headless run of a whole lesson through the real consumer loop.
#[test]
fn headless_lesson_flow_reaches_results() {
    // a mistake undone before the line fills, then a clean second line
    let mut keys = vec![Key::Enter];
    keys.extend(keys_for("x"));
    keys.push(Key::Backspace);
    keys.extend(keys_for("hi"));
    keys.push(Key::Enter);
    keys.extend(keys_for("ok"));
    keys.push(Key::Char(' '));
    keys.push(Key::Char('q'));

    let rx = scripted(keys);
    let mut app = App::new(lessons(), Settings::default());
    let mut renderer = RecordingRenderer::default();

    app::run_loop(&mut app, &rx, &mut renderer).unwrap();

    assert_eq!(app.state, AppState::Results);
    assert_eq!(renderer.frames.first().map(String::as_str), Some("menu"));
    assert_eq!(renderer.frames.last().map(String::as_str), Some("results"));
    assert_eq!(renderer.bells, 1);

    let total = app.session.as_ref().unwrap().total_stats();
    assert_eq!(total.total, 4);
    assert_eq!(total.correct, 4);
    assert_eq!(total.errors, 0);
}

#[test]
fn quiet_mode_never_rings() {
    let mut keys = vec![Key::Enter];
    keys.extend(keys_for("zz"));
    keys.push(Key::CtrlC);

    let rx = scripted(keys);
    let settings = Settings {
        bell: false,
        ..Settings::default()
    };
    let mut app = App::new(lessons(), settings);
    let mut renderer = RecordingRenderer::default();

    app::run_loop(&mut app, &rx, &mut renderer).unwrap();

    assert_eq!(renderer.bells, 0);
    assert_eq!(app.state, AppState::LineComplete);
}

#[test]
fn closed_input_ends_the_loop() {
    let rx = scripted(vec![Key::Down]);
    let mut app = App::new(lessons(), Settings::default());
    let mut renderer = RecordingRenderer::default();

    app::run_loop(&mut app, &rx, &mut renderer).unwrap();

    assert_eq!(app.selected, 1);
    assert_eq!(app.state, AppState::Menu);
}

#[test]
fn arcade_ticks_until_escape() {
    let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);
    let settings = Settings {
        tick: Duration::from_millis(5),
        ..Settings::default()
    };
    let mut app = App::new(lessons(), settings);
    let mut renderer = RecordingRenderer::default();

    std::thread::spawn(move || {
        tx.send(Key::Char('2')).unwrap();
        tx.send(Key::Enter).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        tx.send(Key::Escape).unwrap();
        tx.send(Key::Char('q')).unwrap();
    });

    app::run_loop(&mut app, &rx, &mut renderer).unwrap();

    assert_eq!(app.state, AppState::Menu);
    assert!(app.arcade.is_none());
    let arcade_frames = renderer.frames.iter().filter(|f| *f == "arcade").count();
    assert!(arcade_frames > 2, "expected tick-driven redraws, got {arcade_frames}");
    assert_eq!(renderer.frames.last().map(String::as_str), Some("menu"));
}

#[test]
fn arcade_game_over_then_quit() {
    let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);
    let settings = Settings {
        tick: Duration::from_millis(1),
        bell: false,
        ..Settings::default()
    };
    let mut app = App::new(lessons(), settings);
    app.handle_key(Key::Char('2'));
    app.handle_key(Key::Enter);
    app.arcade.as_mut().unwrap().lives = 1;
    let mut renderer = RecordingRenderer::default();

    // nobody shoots: the first invader to reach the bottom ends the game
    let sender = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(1500));
        tx.send(Key::Char('q')).unwrap();
        // keep the sender alive until the loop has returned
        std::thread::sleep(Duration::from_millis(200));
    });

    let exit = app::run_arcade(&mut app, &rx, &mut renderer).unwrap();
    sender.join().unwrap();

    assert_eq!(exit, ArcadeExit::Quit);
    assert!(app.arcade.as_ref().unwrap().is_over());
    assert!(renderer.frames.iter().any(|f| f == "game-over"));
}
