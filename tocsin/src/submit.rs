//! Producer side: parse submission lines and queue alarms

use crate::alarm::AlarmRequest;
use crate::queue::AlarmQueue;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors for a single submission line.
///
/// All variants are recoverable: the line is reported and dropped, the
/// queue is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Delay field is not a non-negative integer
    #[error("invalid delay: {0:?}")]
    InvalidDelay(String),

    /// Line has a delay but no message
    #[error("missing message")]
    MissingMessage,
}

/// Parse one input line: `<seconds> <message to end of line>`.
///
/// Blank and whitespace-only lines are no-ops and parse to `Ok(None)`.
/// Leading and trailing whitespace is stripped; the message is everything
/// after the first whitespace run.
pub fn parse_line(line: &str) -> Result<Option<(u64, &str)>, SubmitError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let delay = parts.next().unwrap_or_default();
    let delay: u64 = delay
        .parse()
        .map_err(|_| SubmitError::InvalidDelay(delay.to_string()))?;

    let message = parts
        .next()
        .map(str::trim_start)
        .filter(|message| !message.is_empty())
        .ok_or(SubmitError::MissingMessage)?;

    Ok(Some((delay, message)))
}

/// The producer half of the scheduler: turns `(delay, message)` pairs into
/// queued alarm requests.
pub struct Submitter {
    queue: Arc<AlarmQueue>,
}

impl Submitter {
    pub fn new(queue: Arc<AlarmQueue>) -> Self {
        Self { queue }
    }

    /// Queue an alarm due `delay_secs` from now. Returns the stored message
    /// length after the payload bound is applied.
    pub fn submit(&self, delay_secs: u64, message: &str) -> usize {
        let request = AlarmRequest::after(delay_secs, message);
        let stored = request.message.len();
        debug!(delay_secs, stored, "alarm queued");
        self.queue.insert(request);
        stored
    }

    /// Parse and submit one line. `Ok(true)` if an alarm was queued,
    /// `Ok(false)` for an ignored blank line.
    pub fn submit_line(&self, line: &str) -> Result<bool, SubmitError> {
        match parse_line(line)? {
            Some((delay_secs, message)) => {
                self.submit(delay_secs, message);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
