//! Fixed-rate trigger
//!
//! Facilitates running something at a fixed rate inside a polling loop
//! without sleeping:
//!
//! ```
//! use std::time::Duration;
//! use spanstore::Interval;
//!
//! let mut interval = Interval::new(Duration::from_millis(100));
//! let mut iterations = 0;
//! loop {
//!     if interval.tick() {
//!         // runs at most once per 100 ms
//!     }
//!     iterations += 1;
//!     if iterations > 3 {
//!         break;
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Returns true from [`tick`](Interval::tick) at most once per period
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    last_fired: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: None,
        }
    }

    /// True when at least one period has elapsed since the last true return
    ///
    /// The first call after construction always fires.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.period => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}
