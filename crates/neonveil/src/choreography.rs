//! Timed UI sequences.
//!
//! A [`Sequence`] is a list of actions, each due at an offset from the moment
//! the sequence starts. A [`Choreographer`] runs one sequence at a time:
//! starting a new one drops whatever was still pending from the previous.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Ordered `(offset, action)` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<A> {
    steps: Vec<(Duration, A)>,
}

impl<A> Default for Sequence<A> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<A> Sequence<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action due `offset` after the sequence starts.
    pub fn at(mut self, offset: Duration, action: A) -> Self {
        self.steps.push((offset, action));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceHandle(u64);

#[derive(Debug)]
struct Running<A> {
    handle: SequenceHandle,
    started: Instant,
    steps: VecDeque<(Duration, A)>,
}

/// Runs at most one [`Sequence`] at a time.
#[derive(Debug)]
pub struct Choreographer<A> {
    next_id: u64,
    running: Option<Running<A>>,
}

impl<A> Default for Choreographer<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            running: None,
        }
    }
}

impl<A> Choreographer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `sequence` at `now`, superseding any sequence still in flight.
    pub fn start(&mut self, sequence: Sequence<A>, now: Instant) -> SequenceHandle {
        let handle = SequenceHandle(self.next_id);
        self.next_id += 1;
        if let Some(previous) = self.running.take()
            && !previous.steps.is_empty()
        {
            tracing::debug!(pending = previous.steps.len(), "sequence superseded");
        }
        let mut steps = sequence.steps;
        // stable: steps sharing an offset keep their insertion order
        steps.sort_by_key(|(offset, _)| *offset);
        self.running = Some(Running {
            handle,
            started: now,
            steps: steps.into(),
        });
        handle
    }

    /// Drop the sequence if it is still the running one.
    pub fn cancel(&mut self, handle: SequenceHandle) -> bool {
        match &self.running {
            Some(running) if running.handle == handle => {
                self.running = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a sequence still has pending steps.
    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|r| !r.steps.is_empty())
    }

    /// Remove and return every action due at `now`, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<A> {
        let Some(running) = self.running.as_mut() else {
            return Vec::new();
        };
        let elapsed = now.saturating_duration_since(running.started);
        let mut due = Vec::new();
        while running
            .steps
            .front()
            .is_some_and(|(offset, _)| *offset <= elapsed)
        {
            if let Some((_, action)) = running.steps.pop_front() {
                due.push(action);
            }
        }
        if running.steps.is_empty() {
            self.running = None;
        }
        due
    }
}
