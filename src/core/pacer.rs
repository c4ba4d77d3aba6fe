//! Fixed-interval pacing between entity starts.
//!
//! The inter-entity delay is a deliberate throttle on outbound calls, not a
//! correctness requirement. Owning it here keeps it decoupled from the
//! per-entity work and independently testable.

use std::time::Duration;
use tokio::time::Instant;

pub struct Pacer {
    period: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// Wait until at least `period` has elapsed since the previous call. The
    /// first call never waits.
    pub async fn pace(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.period).await;
        }
        self.last = Some(Instant::now());
    }
}
