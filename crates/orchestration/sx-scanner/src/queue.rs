//! Task queue handing candidates to workers.

use parking_lot::Mutex;
use std::collections::VecDeque;
use sx_types::Candidate;
use tracing::debug;

struct QueueState {
    pending: VecDeque<Candidate>,
    closed: bool,
}

/// Finite, ordered queue of candidates.
///
/// The whole wordlist is enqueued at construction; workers then [`take`]
/// until the queue is exhausted or [`close`]d. There is no re-queueing.
///
/// [`take`]: TaskQueue::take
/// [`close`]: TaskQueue::close
pub struct TaskQueue {
    state: Mutex<QueueState>,
    total: usize,
}

impl TaskQueue {
    /// Create a queue from candidates in wordlist order.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let total = candidates.len();
        Self {
            state: Mutex::new(QueueState {
                pending: candidates.into(),
                closed: false,
            }),
            total,
        }
    }

    /// Create a queue from bare names, indexing them in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Candidate::from_names(names))
    }

    /// Take the next candidate, or `None` once exhausted or closed.
    pub fn take(&self) -> Option<Candidate> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.pending.pop_front()
    }

    /// Stop dispatching and return the candidates that were never taken.
    ///
    /// Calling this more than once returns an empty list after the first call.
    pub fn close(&self) -> Vec<Candidate> {
        let mut state = self.state.lock();
        state.closed = true;
        let undispatched: Vec<Candidate> = state.pending.drain(..).collect();
        if !undispatched.is_empty() {
            debug!(count = undispatched.len(), "Task queue closed with pending candidates");
        }
        undispatched
    }

    /// Candidates not yet taken.
    pub fn remaining(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Number of candidates the queue was built with.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether the queue was built empty.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
