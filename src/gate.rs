//! Rate limiter for outbound requests to the music database.
//!
//! Every request takes a permit first. Permits are handed out strictly in
//! arrival order and the start of any two permitted requests is at least the
//! configured interval apart, no matter how many tasks ask at the same time.

use std::time::Duration;

use tokio::{
    sync::Mutex,
    time::{Instant, sleep_until},
};

/// Proof that the caller waited for its slot.
#[derive(Debug, Clone, Copy)]
pub struct Permit {
    granted_at: Instant,
}

impl Permit {
    pub fn granted_at(&self) -> Instant {
        self.granted_at
    }
}

pub struct FetchGate {
    min_interval: Duration,
    // Start time of the most recently permitted request.
    last_start: Mutex<Option<Instant>>,
}

impl FetchGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the caller may start its request.
    ///
    /// The lock is held while sleeping: tokio's mutex queues waiters fairly,
    /// so each requester reads the clock only after the previous one has been
    /// granted and gets a full slot of its own.
    pub async fn acquire(&self) -> Permit {
        let mut last_start = self.last_start.lock().await;

        if let Some(last) = *last_start {
            let next_slot = last + self.min_interval;
            if Instant::now() < next_slot {
                sleep_until(next_slot).await;
            }
        }

        let granted_at = Instant::now();
        *last_start = Some(granted_at);
        Permit { granted_at }
    }
}
