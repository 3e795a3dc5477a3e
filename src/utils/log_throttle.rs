use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct WindowState {
    window_started_at: Option<Instant>,
    suppressed: u64,
}

/// Rate limits a single recurring log event to one emission per window.
///
/// Owned by whoever logs the event, so there is no process-wide registry.
#[derive(Debug)]
pub struct LogThrottle {
    interval: Duration,
    state: Mutex<WindowState>,
}

impl LogThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Mutex::new(WindowState {
                window_started_at: None,
                suppressed: 0,
            }),
        }
    }

    /// Returns `Some(suppressed_count)` when the event should be logged,
    /// otherwise `None` and the event is counted as suppressed for the active window.
    pub fn should_emit(&self) -> Option<u64> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        match state.window_started_at {
            Some(started) if now.duration_since(started) < self.interval => {
                state.suppressed += 1;
                None
            }
            _ => {
                let suppressed = state.suppressed;
                state.window_started_at = Some(now);
                state.suppressed = 0;
                Some(suppressed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogThrottle;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn emits_then_suppresses_then_emits_with_count() {
        let throttle = LogThrottle::new(Duration::from_millis(20));

        assert_eq!(throttle.should_emit(), Some(0));
        assert_eq!(throttle.should_emit(), None);
        assert_eq!(throttle.should_emit(), None);

        sleep(Duration::from_millis(30));
        assert_eq!(throttle.should_emit(), Some(2));
        assert_eq!(throttle.should_emit(), None);
    }
}
