//! Notification delivery

use crate::alarm::AlarmRequest;
use chrono::Local;
use tracing::info;

/// Where fired alarms are delivered.
///
/// The scheduler takes the sink by injection so the loop can be tested
/// without touching stdout.
pub trait NotificationSink: Send + 'static {
    /// Deliver one fired alarm. Called outside the queue lock.
    fn deliver(&self, request: &AlarmRequest);
}

/// Prints fired alarms to stdout, one line per alarm.
pub struct ConsoleSink;

impl ConsoleSink {
    fn format_line(request: &AlarmRequest) -> String {
        format!(
            "[{}] ({}) {}",
            Local::now().format("%H:%M:%S"),
            request.delay_secs,
            request.message
        )
    }
}

impl NotificationSink for ConsoleSink {
    fn deliver(&self, request: &AlarmRequest) {
        info!(message = %request.message, delay_secs = request.delay_secs, "alarm fired");
        println!("{}", Self::format_line(request));
    }
}
