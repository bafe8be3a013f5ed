use std::iter::Sum;
use std::ops::Add;
use std::time::Duration;

/// Immutable snapshot of typing performance for one or more lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub correct: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl Stats {
    /// Characters per minute; 0 when no time has elapsed
    pub fn cpm(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        self.total as f64 / minutes
    }

    pub fn wpm(&self) -> f64 {
        self.cpm() / 5.0
    }

    /// Percentage of correct keystrokes, 100 when nothing was typed
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    pub fn grade(&self) -> Grade {
        let acc = self.accuracy();
        let cpm = self.cpm();

        match () {
            _ if acc >= 98.0 && cpm >= 300.0 => Grade::APlus,
            _ if acc >= 95.0 && cpm >= 250.0 => Grade::A,
            _ if acc >= 92.0 && cpm >= 200.0 => Grade::BPlus,
            _ if acc >= 90.0 && cpm >= 150.0 => Grade::B,
            _ if acc >= 85.0 && cpm >= 100.0 => Grade::C,
            _ if acc >= 80.0 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Stats) -> Stats {
        Stats {
            total: self.total + rhs.total,
            correct: self.correct + rhs.correct,
            errors: self.errors + rhs.errors,
            elapsed: self.elapsed + rhs.elapsed,
        }
    }
}

impl<'a> Sum<&'a Stats> for Stats {
    fn sum<I: Iterator<Item = &'a Stats>>(iter: I) -> Stats {
        iter.fold(Stats::default(), |acc, s| acc + *s)
    }
}

/// Letter grade shown on the score report
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Grade {
    #[strum(serialize = "A+")]
    APlus,
    A,
    #[strum(serialize = "B+")]
    BPlus,
    B,
    C,
    D,
    F,
}
