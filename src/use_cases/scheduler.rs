// Fixed-rate tick timer owned by a single match task.
//
// The scheduler holds at most one pending deadline, so arming it twice can
// never produce two interleaved tick streams for the same match.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Schedules the next tick one interval from now. Returns false if a tick
    /// is already pending.
    pub fn arm(&mut self) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(Instant::now() + self.interval);
        true
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Sleeps until `deadline`, or forever when there is none.
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
