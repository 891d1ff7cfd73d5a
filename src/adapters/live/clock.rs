//! Live clock using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_current_time() {
        let before = Utc::now();
        let now = LiveClock.now();
        let after = Utc::now();
        assert!(now >= before && now <= after);
    }
}
