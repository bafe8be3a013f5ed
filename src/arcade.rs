//! Letter-shooting arcade game.
//!
//! Invaders carrying a letter fall down the field one clock tick at a time;
//! typing the letter shoots the lowest matching invader.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

pub const FIELD_WIDTH: u16 = 60;
pub const FIELD_HEIGHT: u16 = 18;
/// Columns kept free on each side when spawning
pub const SPAWN_MARGIN: u16 = 2;

pub const INITIAL_LIVES: u32 = 3;
pub const INITIAL_SPEED: f64 = 0.3;
pub const SPEED_STEP: f64 = 0.08;
pub const INITIAL_SPAWN_INTERVAL: u64 = 8;
pub const MIN_SPAWN_INTERVAL: u64 = 3;
pub const HITS_PER_LEVEL: u32 = 15;
pub const POINTS_PER_HIT: u32 = 10;

pub const DEFAULT_TICK: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    pub letter: char,
    pub col: u16,
    /// Fractional row; the integer part is the row it occupies
    pub row: f64,
    pub alive: bool,
}

impl Invader {
    pub fn new(letter: char, col: u16) -> Self {
        Self {
            letter,
            col,
            row: 0.0,
            alive: true,
        }
    }

    pub fn row_index(&self) -> u16 {
        self.row as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// What happened during one clock tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: bool,
    /// Invaders that crossed the bottom of the field
    pub escaped: u32,
    pub leveled_up: bool,
}

#[derive(Debug)]
pub struct ArcadeGame {
    pub invaders: Vec<Invader>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub hits: u32,
    pub missed: u32,
    pub tick: u64,
    pub speed: f64,
    pub spawn_interval: u64,
    pub phase: Phase,
    rng: StdRng,
}

impl ArcadeGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic game, used by tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            invaders: vec![],
            score: 0,
            lives: INITIAL_LIVES,
            level: 1,
            hits: 0,
            missed: 0,
            tick: 0,
            speed: INITIAL_SPEED,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            phase: Phase::Playing,
            rng,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn alive_invaders(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.iter().filter(|inv| inv.alive)
    }

    fn spawn(&mut self) {
        let letter = char::from(self.rng.gen_range(b'a'..=b'z'));
        let col = self.rng.gen_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN);
        self.invaders.push(Invader::new(letter, col));
    }

    /// Advance the simulation by one clock tick. A no-op once the game is over.
    pub fn update(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.is_over() {
            return report;
        }

        self.tick += 1;
        if self.tick % self.spawn_interval == 0 {
            self.spawn();
            report.spawned = true;
        }

        let speed = self.speed;
        let mut escaped = 0;
        self.invaders.retain_mut(|inv| {
            if !inv.alive {
                return false;
            }
            inv.row += speed;
            if inv.row_index() >= FIELD_HEIGHT {
                escaped += 1;
                return false;
            }
            true
        });

        if escaped > 0 {
            report.escaped = escaped;
            self.missed += escaped;
            self.lives = self.lives.saturating_sub(escaped);
            debug!(escaped, lives = self.lives, "invaders reached the bottom");
            if self.lives == 0 {
                self.phase = Phase::GameOver;
                info!(
                    score = self.score,
                    hits = self.hits,
                    missed = self.missed,
                    "game over"
                );
                return report;
            }
        }

        let new_level = self.hits / HITS_PER_LEVEL + 1;
        while self.level < new_level {
            self.level += 1;
            self.speed += SPEED_STEP;
            self.spawn_interval = (self.spawn_interval - 1).max(MIN_SPAWN_INTERVAL);
            report.leveled_up = true;
            info!(
                level = self.level,
                speed = self.speed,
                spawn_interval = self.spawn_interval,
                "level up"
            );
        }

        report
    }

    /// Shoot the alive invader carrying `letter` that is closest to the
    /// bottom. Returns `false` if nothing matched or the game is over.
    pub fn try_shoot(&mut self, letter: char) -> bool {
        if self.is_over() {
            return false;
        }

        let mut best: Option<usize> = None;
        for (idx, inv) in self.invaders.iter().enumerate() {
            if !inv.alive || inv.letter != letter {
                continue;
            }
            // strictly greater keeps the first one on ties
            if best.map_or(true, |b| inv.row > self.invaders[b].row) {
                best = Some(idx);
            }
        }

        let Some(idx) = best else {
            return false;
        };
        self.invaders[idx].alive = false;
        self.score += POINTS_PER_HIT * self.level;
        self.hits += 1;
        true
    }
}

impl Default for ArcadeGame {
    fn default() -> Self {
        Self::new()
    }
}
