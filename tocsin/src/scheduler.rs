//! Consumer loop: waits out each earliest alarm and fires it

use crate::queue::{AlarmQueue, Dequeue};
use crate::sink::NotificationSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// The consumer half of the scheduler: repeatedly takes the earliest
/// pending alarm, sleeps until it is due, and delivers it.
pub struct Scheduler<S: NotificationSink> {
    queue: Arc<AlarmQueue>,
    sink: S,
    poll_interval: Duration,
}

impl<S: NotificationSink> Scheduler<S> {
    pub fn new(queue: Arc<AlarmQueue>, sink: S, poll_interval: Duration) -> Self {
        Self {
            queue,
            sink,
            poll_interval,
        }
    }

    /// Run until the process exits.
    ///
    /// All sleeping happens outside the queue lock, so the producer is
    /// blocked for at most one queue operation at a time. An empty queue is
    /// polled at `poll_interval`; there is no wake-on-insert signal, so a
    /// freshly inserted alarm may wait up to one interval before the loop
    /// sees it. Once an entry has been taken the loop is committed to it:
    /// an earlier-deadline alarm arriving mid-wait fires afterwards.
    pub async fn run(self) {
        loop {
            match self.queue.take_earliest() {
                Dequeue::Empty => {
                    sleep(self.poll_interval).await;
                }
                Dequeue::Alarm { request, wait } => {
                    if wait.is_zero() {
                        // Already due: give the producer one slice before
                        // firing rather than delaying the message.
                        tokio::task::yield_now().await;
                    } else {
                        debug!(
                            message = %request.message,
                            wait_ms = wait.as_millis() as u64,
                            "waiting on alarm"
                        );
                        sleep(wait).await;
                    }
                    self.sink.deliver(&request);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmRequest;
    use std::sync::Mutex;
    use std::time::Instant;

    const POLL: Duration = Duration::from_millis(10);

    #[derive(Clone, Default)]
    struct CaptureSink {
        fired: Arc<Mutex<Vec<String>>>,
    }

    impl CaptureSink {
        fn messages(&self) -> Vec<String> {
            self.fired.lock().unwrap().clone()
        }
    }

    impl NotificationSink for CaptureSink {
        fn deliver(&self, request: &AlarmRequest) {
            self.fired.lock().unwrap().push(request.message.clone());
        }
    }

    fn at_offset(ms: u64, message: &str) -> AlarmRequest {
        AlarmRequest::at(Instant::now() + Duration::from_millis(ms), message)
    }

    #[tokio::test]
    async fn test_zero_delay_alarm_fires_promptly() {
        let queue = Arc::new(AlarmQueue::new());
        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());

        queue.insert(AlarmRequest::after(0, "go"));
        sleep(Duration::from_millis(60)).await;

        assert_eq!(sink.messages(), vec!["go"]);
        task.abort();
    }

    #[tokio::test]
    async fn test_alarms_fire_in_deadline_order() {
        let queue = Arc::new(AlarmQueue::new());
        queue.insert(at_offset(90, "third"));
        queue.insert(at_offset(30, "first"));
        queue.insert(at_offset(60, "second"));

        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());
        sleep(Duration::from_millis(200)).await;

        assert_eq!(sink.messages(), vec!["first", "second", "third"]);
        task.abort();
    }

    #[tokio::test]
    async fn test_committed_wait_is_not_preempted() {
        let queue = Arc::new(AlarmQueue::new());
        queue.insert(at_offset(150, "five"));

        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());

        // Let the loop commit to waiting on "five", then submit an alarm
        // with an earlier deadline. It stays queued until the wait ends.
        sleep(Duration::from_millis(50)).await;
        queue.insert(at_offset(10, "two"));
        sleep(Duration::from_millis(250)).await;

        assert_eq!(sink.messages(), vec!["five", "two"]);
        task.abort();
    }

    #[tokio::test]
    async fn test_earlier_arrival_before_commit_fires_first() {
        let queue = Arc::new(AlarmQueue::new());
        // Both inserted before the loop starts, so the queue orders them
        // and the later-submitted earlier-deadline alarm fires first.
        queue.insert(at_offset(80, "five"));
        queue.insert(at_offset(30, "two"));

        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());
        sleep(Duration::from_millis(180)).await;

        assert_eq!(sink.messages(), vec!["two", "five"]);
        task.abort();
    }

    #[tokio::test]
    async fn test_idle_consumer_fires_nothing() {
        let queue = Arc::new(AlarmQueue::new());
        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());

        sleep(Duration::from_millis(100)).await;

        assert!(sink.messages().is_empty());
        assert!(queue.is_empty());
        task.abort();
    }

    #[tokio::test]
    async fn test_every_alarm_fires_exactly_once() {
        let queue = Arc::new(AlarmQueue::new());
        let sink = CaptureSink::default();
        let task = tokio::spawn(Scheduler::new(queue.clone(), sink.clone(), POLL).run());

        for i in 0..8u64 {
            // Two alarms share each deadline slot.
            queue.insert(at_offset(20 + (i / 2) * 25, &format!("alarm-{}", i)));
        }
        sleep(Duration::from_millis(300)).await;

        let mut fired = sink.messages();
        assert_eq!(fired.len(), 8);
        fired.sort();
        fired.dedup();
        assert_eq!(fired.len(), 8);
        assert!(queue.is_empty());
        task.abort();
    }
}
