use std::time::{Duration, Instant};

/// Elapsed-time measurement for one command cycle
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
    stopped: Option<Instant>,
}

impl Stopwatch {
    pub fn start_new() -> Self {
        Stopwatch {
            started: Instant::now(),
            stopped: None,
        }
    }

    /// Stop the interval. Stopping twice keeps the first stop time.
    pub fn stop(&mut self) -> Duration {
        let stopped = *self.stopped.get_or_insert_with(Instant::now);
        stopped.duration_since(self.started)
    }

    pub fn is_running(&self) -> bool {
        self.stopped.is_none()
    }

    /// Time between start and stop, or until now while still running
    pub fn elapsed(&self) -> Duration {
        match self.stopped {
            Some(stopped) => stopped.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_freezes_elapsed() {
        let mut watch = Stopwatch::start_new();
        assert!(watch.is_running());

        let first = watch.stop();
        assert!(!watch.is_running());
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(watch.elapsed(), first);
        assert_eq!(watch.stop(), first);
    }

    #[test]
    fn test_running_elapsed_grows() {
        let watch = Stopwatch::start_new();
        std::thread::sleep(Duration::from_millis(2));
        assert!(watch.elapsed() >= Duration::from_millis(2));
    }
}
