//! Alarm request types

use std::time::{Duration, Instant};

/// Maximum message payload length in bytes.
///
/// Longer input is truncated silently at this bound. Truncation backs up to
/// a `char` boundary so the stored payload is always valid UTF-8.
pub const MAX_MESSAGE_LEN: usize = 64;

/// A pending alarm: deliver `message` once `deadline` has passed.
#[derive(Debug, Clone)]
pub struct AlarmRequest {
    /// Absolute instant the alarm is due
    pub deadline: Instant,
    /// Requested delay in seconds, kept for display and diagnostics
    pub delay_secs: u64,
    /// Notification payload, at most `MAX_MESSAGE_LEN` bytes
    pub message: String,
}

impl AlarmRequest {
    /// Create an alarm due at an absolute instant.
    pub fn at(deadline: Instant, message: &str) -> Self {
        let delay_secs = deadline.saturating_duration_since(Instant::now()).as_secs();
        Self {
            deadline,
            delay_secs,
            message: bounded_message(message),
        }
    }

    /// Create an alarm due `delay_secs` from now.
    pub fn after(delay_secs: u64, message: &str) -> Self {
        Self {
            deadline: Instant::now() + Duration::from_secs(delay_secs),
            delay_secs,
            message: bounded_message(message),
        }
    }

    /// Time remaining until the deadline, zero if already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whether the alarm is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}

/// Apply the payload bound: messages longer than `MAX_MESSAGE_LEN` bytes are
/// cut at the last `char` boundary at or below the bound.
fn bounded_message(message: &str) -> String {
    if message.len() <= MAX_MESSAGE_LEN {
        return message.to_string();
    }
    let mut end = MAX_MESSAGE_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message[..end].to_string()
}
