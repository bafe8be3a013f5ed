use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::lesson::Lesson;
use crate::stats::Stats;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Tracks one pass through a lesson, line by line
#[derive(Debug, Clone)]
pub struct Session {
    lesson: Rc<Lesson>,
    line_idx: usize,
    target: Vec<char>,
    typed: Vec<char>,
    correct: usize,
    errors: usize,
    started_at: Option<Instant>,
    committed: bool,
    history: Vec<Stats>,
}

impl Session {
    pub fn new(lesson: Rc<Lesson>) -> Self {
        let mut session = Self {
            lesson,
            line_idx: 0,
            target: vec![],
            typed: vec![],
            correct: 0,
            errors: 0,
            started_at: None,
            committed: false,
            history: vec![],
        };
        session.load_line(0);
        session
    }

    fn load_line(&mut self, idx: usize) {
        self.line_idx = idx;
        self.target = self
            .lesson
            .line(idx)
            .map(|line| line.chars().collect())
            .unwrap_or_default();
        self.typed.clear();
        self.correct = 0;
        self.errors = 0;
        self.started_at = None;
        self.committed = false;
    }

    pub fn lesson(&self) -> &Rc<Lesson> {
        &self.lesson
    }

    pub fn line_index(&self) -> usize {
        self.line_idx
    }

    pub fn line_count(&self) -> usize {
        self.lesson.len()
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn line_finished(&self) -> bool {
        self.typed.len() >= self.target.len()
    }

    /// Expected character at `idx` of the current line
    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.target.get(idx).copied()
    }

    /// Type one character. Returns `None` when the line is already full.
    pub fn add_rune(&mut self, c: char) -> Option<Outcome> {
        if self.line_finished() {
            return None;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }

        let outcome = if self.expected_char(self.typed.len()) == Some(c) {
            self.correct += 1;
            Outcome::Correct
        } else {
            self.errors += 1;
            Outcome::Incorrect
        };
        self.typed.push(c);

        Some(outcome)
    }

    /// Remove the last typed character, undoing its counter. Returns
    /// `false` when nothing was typed.
    pub fn backspace(&mut self) -> bool {
        let Some(c) = self.typed.pop() else {
            return false;
        };

        if self.expected_char(self.typed.len()) == Some(c) {
            self.correct -= 1;
        } else {
            self.errors -= 1;
        }
        true
    }

    /// Commit the stats of a full line to the history. Returns `None` if the
    /// line is not full yet or was already committed.
    pub fn finish_line(&mut self) -> Option<Stats> {
        if !self.line_finished() || self.committed {
            return None;
        }

        let stats = self.live_stats();
        self.history.push(stats);
        self.committed = true;
        Some(stats)
    }

    /// Move on to the next line. Returns `false` on the last line.
    pub fn advance_line(&mut self) -> bool {
        if self.line_idx + 1 >= self.lesson.len() {
            return false;
        }
        self.load_line(self.line_idx + 1);
        true
    }

    pub fn all_done(&self) -> bool {
        self.line_idx + 1 >= self.lesson.len() && self.line_finished()
    }

    /// Stats of the line being typed, committed or not
    pub fn live_stats(&self) -> Stats {
        Stats {
            total: self.correct + self.errors,
            correct: self.correct,
            errors: self.errors,
            elapsed: self.elapsed(),
        }
    }

    /// Stats of the most recently committed line
    pub fn last_line_stats(&self) -> Option<&Stats> {
        self.history.last()
    }

    /// Committed lines only; a line in progress counts once it is finished
    pub fn total_stats(&self) -> Stats {
        self.history.iter().sum()
    }

    pub fn history(&self) -> &[Stats] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session(lines: &[&str]) -> Session {
        let lesson = Lesson::new("test", lines.iter().map(|l| l.to_string()).collect()).unwrap();
        Session::new(Rc::new(lesson))
    }

    #[test]
    fn test_session_new() {
        let s = session(&["hello", "world"]);

        assert_eq!(s.line_index(), 0);
        assert_eq!(s.line_count(), 2);
        assert_eq!(s.target(), &['h', 'e', 'l', 'l', 'o']);
        assert!(s.typed().is_empty());
        assert!(!s.has_started());
        assert!(!s.line_finished());
        assert_eq!(s.total_stats(), Stats::default());
    }

    #[test]
    fn test_first_rune_starts_timer() {
        let mut s = session(&["test"]);
        assert_eq!(s.elapsed(), Duration::ZERO);

        s.add_rune('t');
        assert!(s.has_started());
    }

    #[test]
    fn test_add_rune_outcomes() {
        let mut s = session(&["test"]);

        assert_eq!(s.add_rune('t'), Some(Outcome::Correct));
        assert_eq!(s.add_rune('x'), Some(Outcome::Incorrect));
        assert_eq!(s.correct(), 1);
        assert_eq!(s.errors(), 1);
        assert_eq!(s.typed(), &['t', 'x']);
    }

    #[test]
    fn test_add_rune_on_finished_line_is_noop() {
        let mut s = session(&["hi"]);
        s.add_rune('h');
        s.add_rune('i');

        assert_eq!(s.add_rune('!'), None);
        assert_eq!(s.typed().len(), 2);
        assert_eq!(s.correct(), 2);
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut s = session(&["test"]);

        assert!(!s.backspace());
        assert_eq!(s.correct(), 0);
        assert_eq!(s.errors(), 0);
    }

    #[test]
    fn test_typed_abc_against_abd() {
        let mut s = session(&["abd"]);
        s.add_rune('a');
        s.add_rune('b');
        s.add_rune('c');

        assert_eq!(s.correct(), 2);
        assert_eq!(s.errors(), 1);

        assert!(s.backspace());
        assert_eq!(s.correct(), 2);
        assert_eq!(s.errors(), 0);
        assert_eq!(s.typed().len(), 2);
    }

    #[test]
    fn test_finish_line_commits_once() {
        let mut s = session(&["ab", "cd"]);
        assert_eq!(s.finish_line(), None);

        s.add_rune('a');
        s.add_rune('x');
        let stats = s.finish_line().unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(s.finish_line(), None);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.last_line_stats(), Some(&stats));
    }

    #[test]
    fn test_advance_line_resets_line_state() {
        let mut s = session(&["ab", "cd"]);
        s.add_rune('a');
        s.add_rune('b');
        s.finish_line();

        assert!(s.advance_line());
        assert_eq!(s.line_index(), 1);
        assert_eq!(s.target(), &['c', 'd']);
        assert!(s.typed().is_empty());
        assert_eq!(s.correct(), 0);
        assert!(!s.has_started());
    }

    #[test]
    fn test_advance_line_on_last_line() {
        let mut s = session(&["ab"]);
        assert!(!s.advance_line());
        assert_eq!(s.line_index(), 0);
    }

    #[test]
    fn test_all_done() {
        let mut s = session(&["a", "b"]);
        assert!(!s.all_done());

        s.add_rune('a');
        // first line full, but not the last line
        assert!(!s.all_done());

        s.finish_line();
        s.advance_line();
        assert!(!s.all_done());

        s.add_rune('b');
        assert!(s.all_done());
    }

    #[test]
    fn test_total_stats_only_counts_committed_lines() {
        let mut s = session(&["ab", "cd"]);
        s.add_rune('a');
        s.add_rune('b');
        s.finish_line();
        s.advance_line();
        s.add_rune('c');

        let total = s.total_stats();
        assert_eq!(total.total, 2);
        assert_eq!(total.correct, 2);

        s.add_rune('z');
        assert_eq!(s.total_stats().total, 2);
        s.finish_line();

        let total = s.total_stats();
        assert_eq!(total.total, 4);
        assert_eq!(total.correct, 3);
        assert_eq!(total.errors, 1);
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Type(char),
        Backspace,
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            3 => prop::sample::select(vec!['a', 'b', 'c', 'd', ' ']).prop_map(Edit::Type),
            1 => Just(Edit::Backspace),
        ]
    }

    proptest! {
        #[test]
        fn counters_track_typed_buffer(edits in prop::collection::vec(edit(), 0..64)) {
            let mut s = session(&["abc dab cab"]);
            let target_len = s.target().len();

            for e in edits {
                match e {
                    Edit::Type(c) => { s.add_rune(c); }
                    Edit::Backspace => { s.backspace(); }
                }
                prop_assert_eq!(s.correct() + s.errors(), s.typed().len());
                prop_assert!(s.typed().len() <= target_len);
                prop_assert!(s.correct() <= target_len);
                prop_assert!(s.errors() <= target_len);
            }
        }

        #[test]
        fn backspace_undoes_add_rune(
            prefix in prop::collection::vec(prop::sample::select(vec!['a', 'b', 'x']), 0..5),
            c in prop::sample::select(vec!['a', 'b', 'x']),
        ) {
            let mut s = session(&["abab ab"]);
            for p in prefix {
                s.add_rune(p);
            }
            let before = (s.correct(), s.errors(), s.typed().to_vec());

            s.add_rune(c);
            s.backspace();

            prop_assert_eq!((s.correct(), s.errors(), s.typed().to_vec()), before);
        }
    }
}
