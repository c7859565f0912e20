//! Time-ordered queue of pending alarms, shared by producer and consumer

use crate::alarm::AlarmRequest;
use std::collections::VecDeque;
use std::process;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Result of a single [`AlarmQueue::take_earliest`] call.
#[derive(Debug)]
pub enum Dequeue {
    /// Queue was empty. The caller should sleep one poll interval and retry.
    Empty,
    /// The head entry was removed. `wait` is the time until it is due,
    /// zero if the deadline has already passed.
    Alarm { request: AlarmRequest, wait: Duration },
}

/// Pending alarms ordered ascending by deadline, guarded by one mutex.
///
/// The consumer removes the earliest entry *before* waiting on it, so an
/// alarm submitted later with an earlier deadline is not reconsidered until
/// the current wait completes. That staleness window is part of the
/// contract; a peek-then-recheck scheme would close it at the cost of a
/// different concurrency contract.
pub struct AlarmQueue {
    pending: Mutex<VecDeque<AlarmRequest>>,
}

impl AlarmQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Insert an alarm, keeping the queue sorted by deadline.
    ///
    /// The new entry lands before the first entry with a strictly later
    /// deadline, so equal-deadline alarms fire in submission order.
    pub fn insert(&self, request: AlarmRequest) {
        let mut pending = self.locked("insert");
        let at = pending
            .iter()
            .position(|entry| entry.deadline > request.deadline)
            .unwrap_or(pending.len());
        pending.insert(at, request);

        let dump = if tracing::enabled!(tracing::Level::DEBUG) {
            let now = Instant::now();
            Some(
                pending
                    .iter()
                    .map(|entry| format!("{}s[\"{}\"]", entry.remaining(now).as_secs(), entry.message))
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        } else {
            None
        };
        drop(pending);

        if let Some(dump) = dump {
            debug!("pending alarms: [{}]", dump);
        }
    }

    /// Remove and return the earliest alarm, or report an empty queue.
    ///
    /// The head is removed unconditionally, due or not; the returned wait
    /// duration tells the caller how long to sleep before firing it.
    pub fn take_earliest(&self) -> Dequeue {
        let mut pending = self.locked("take_earliest");
        match pending.pop_front() {
            Some(request) => {
                let wait = request.remaining(Instant::now());
                Dequeue::Alarm { request, wait }
            }
            None => Dequeue::Empty,
        }
    }

    /// Number of pending alarms.
    pub fn len(&self) -> usize {
        self.locked("len").len()
    }

    /// Whether no alarms are pending.
    pub fn is_empty(&self) -> bool {
        self.locked("is_empty").is_empty()
    }

    /// A poisoned lock means another thread panicked inside a critical
    /// section; the sorted invariant can no longer be trusted.
    fn locked(&self, op: &str) -> MutexGuard<'_, VecDeque<AlarmRequest>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(_) => {
                error!("alarm queue mutex poisoned during {}", op);
                process::abort();
            }
        }
    }
}

impl Default for AlarmQueue {
    fn default() -> Self {
        Self::new()
    }
}
