use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::key::{self, Key};

/// Capacity of the queue between the reader thread and the consumer
pub const QUEUE_CAPACITY: usize = 8;

/// Size of a single raw read; one read is decoded into one key
const READ_BUFFER_LEN: usize = 16;

/// Unified event type consumed by the arcade loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TutorEvent {
    Key(Key),
    Tick,
}

/// Source of decoded keys (the consumer side of the input queue)
pub trait KeySource {
    /// Block until a key arrives. Returns `None` once the producer is gone.
    fn recv(&self) -> Option<Key>;

    /// Block for up to `timeout` waiting for a key.
    fn recv_timeout(&self, timeout: Duration) -> Result<Key, RecvTimeoutError>;
}

impl KeySource for Receiver<Key> {
    fn recv(&self) -> Option<Key> {
        Receiver::recv(self).ok()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<Key, RecvTimeoutError> {
        Receiver::recv_timeout(self, timeout)
    }
}

/// Background reader feeding decoded keys into a bounded FIFO.
///
/// The reader thread is the only producer. When the queue is full it blocks
/// instead of dropping keys. It is never joined; it goes away with the
/// process.
pub struct InputChannel {
    rx: Receiver<Key>,
}

impl InputChannel {
    pub fn spawn<R>(mut reader: R) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);

        thread::Builder::new()
            .name("input-reader".into())
            .spawn(move || {
                let mut buf = [0u8; READ_BUFFER_LEN];
                loop {
                    let key = match reader.read(&mut buf) {
                        Ok(0) => {
                            debug!("input stream closed");
                            break;
                        }
                        Ok(n) => key::decode(&buf[..n]),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!(error = %e, "input read failed, stopping reader");
                            break;
                        }
                    };

                    if tx.send(key).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self { rx })
    }
}

impl KeySource for InputChannel {
    fn recv(&self) -> Option<Key> {
        self.rx.recv().ok()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<Key, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Merges a fixed-interval clock with a key source into one event stream.
///
/// Ticks are scheduled against a deadline, so a steady stream of keys does
/// not starve the clock.
pub struct Runner<'a, S: KeySource + ?Sized, T: Ticker> {
    source: &'a S,
    ticker: T,
    deadline: Instant,
}

impl<'a, S: KeySource + ?Sized, T: Ticker> Runner<'a, S, T> {
    pub fn new(source: &'a S, ticker: T) -> Self {
        let deadline = Instant::now() + ticker.interval();
        Self {
            source,
            ticker,
            deadline,
        }
    }

    /// Blocks until the next tick or key. Returns `None` once the key source
    /// has disconnected.
    pub fn step(&mut self) -> Option<TutorEvent> {
        let now = Instant::now();
        if now >= self.deadline {
            self.advance_deadline(now);
            return Some(TutorEvent::Tick);
        }

        match self.source.recv_timeout(self.deadline - now) {
            Ok(key) => Some(TutorEvent::Key(key)),
            Err(RecvTimeoutError::Timeout) => {
                self.advance_deadline(Instant::now());
                Some(TutorEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn advance_deadline(&mut self, now: Instant) {
        self.deadline += self.ticker.interval();
        // fell far behind (suspended terminal etc.): resync instead of bursting
        if self.deadline <= now {
            self.deadline = now + self.ticker.interval();
        }
    }
}
