use std::time::{Duration, Instant};

/// Rate limit for live previews: at most one render per interval.
///
/// Not a queue. Requests arriving inside the interval are dropped and the next
/// admitted request renders whatever state is current at that moment.
#[derive(Clone, Debug)]
pub struct PreviewThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl PreviewThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Admit a render at `now` if the interval since the last admitted one has elapsed.
    pub fn admit(&mut self, now: Instant) -> bool {
        let ready = self
            .last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if ready {
            self.last = Some(now);
        }
        ready
    }

    /// Forget the last render so the next request is admitted.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
