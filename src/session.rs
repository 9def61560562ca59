//! Per-terminal session state and the capabilities injected into commands.
//!
//! Nothing here is global: a [`Session`] owns the history, the random source,
//! and the input-lock and pacing capabilities, and is passed explicitly to
//! the evaluator.

use std::cell::Cell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Input lock ──

/// Exclusive control over the terminal's input line.
///
/// Suspending commands disable input for the duration of their run.
pub trait InputLock {
    fn disable(&self);
    fn enable(&self);
}

/// RAII guard returned by [`acquire_input`]. Re-enables input on drop,
/// including on early return and unwind.
#[must_use = "input is re-enabled as soon as the guard is dropped"]
pub struct InputGuard<'a> {
    lock: &'a dyn InputLock,
}

/// Disable input until the returned guard is dropped.
pub fn acquire_input(lock: &dyn InputLock) -> InputGuard<'_> {
    lock.disable();
    InputGuard { lock }
}

impl Drop for InputGuard<'_> {
    fn drop(&mut self) {
        self.lock.enable();
    }
}

/// Simple in-process input gate: a flag the front end polls before reading.
#[derive(Debug, Default)]
pub struct InputGate {
    disabled: Cell<bool>,
}

impl InputGate {
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }
}

impl InputLock for InputGate {
    fn disable(&self) {
        log::debug!("input disabled");
        self.disabled.set(true);
    }

    fn enable(&self) {
        log::debug!("input enabled");
        self.disabled.set(false);
    }
}

// ── Pacing ──

/// Clock used by animated commands to wait between frames.
#[async_trait(?Send)]
pub trait Pacer {
    async fn pause(&self, duration: Duration);
}

/// Never waits. Used by tests and non-interactive output.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPacer;

#[async_trait(?Send)]
impl Pacer for InstantPacer {
    async fn pause(&self, _duration: Duration) {}
}

/// Blocks the current thread. Fine for the single-threaded REPL, where
/// nothing else runs while a command is suspended.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

#[async_trait(?Send)]
impl Pacer for ThreadPacer {
    async fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ── History ──

/// Submitted lines, newest first, with an up/down navigation cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Record a line at the front and reset the cursor.
    pub fn push(&mut self, line: &str) {
        self.entries.push_front(line.to_string());
        self.entries.truncate(self.limit);
        self.cursor = None;
    }

    /// Step to an older entry (arrow up). Stays on the oldest.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to a newer entry (arrow down). Past the newest, returns the
    /// empty line and resets the cursor.
    pub fn newer(&mut self) -> &str {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1).map_or("", String::as_str)
            }
            _ => {
                self.cursor = None;
                ""
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Autocomplete ──

/// Result of tab completion against the command names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    Unique(String),
    Ambiguous(Vec<String>),
}

/// Complete a partial command name against `names` (case-insensitive prefix).
pub fn complete<'a>(partial: &str, names: impl IntoIterator<Item = &'a str>) -> Completion {
    let partial = partial.trim_start().to_lowercase();
    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|n| n.starts_with(&partial))
        .map(String::from)
        .collect();
    matches.sort();
    matches.dedup();
    match matches.len() {
        0 => Completion::None,
        1 => Completion::Unique(matches.remove(0)),
        _ => Completion::Ambiguous(matches),
    }
}

// ── Session ──

/// State owned by one terminal and threaded through every evaluation.
pub struct Session {
    pub history: History,
    pub(crate) rng: StdRng,
    input: Box<dyn InputLock>,
    pacer: Box<dyn Pacer>,
}

impl Session {
    pub fn new(history_limit: usize, input: Box<dyn InputLock>, pacer: Box<dyn Pacer>) -> Self {
        Self {
            history: History::new(history_limit),
            rng: StdRng::from_os_rng(),
            input,
            pacer,
        }
    }

    /// Session with a non-blocking pacer, an in-process gate and a fixed seed.
    pub fn for_tests(seed: u64) -> Self {
        Self::new(100, Box::new(InputGate::default()), Box::new(InstantPacer)).with_seed(seed)
    }

    /// Replace the random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn input_lock(&self) -> &dyn InputLock {
        self.input.as_ref()
    }

    pub fn pacer(&self) -> &dyn Pacer {
        self.pacer.as_ref()
    }
}
