use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent step durations.
#[derive(Debug, Clone)]
pub struct StepTimer {
    window: VecDeque<Duration>,
    capacity: usize,
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

impl StepTimer {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(elapsed);
    }

    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn last(&self) -> Option<Duration> {
        self.window.back().copied()
    }

    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        self.window.iter().sum::<Duration>() / self.window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = StepTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
        assert_eq!(timer.last(), None);
    }

    #[test]
    fn tracks_average_and_max() {
        let mut timer = StepTimer::new(3);
        timer.record(Duration::from_millis(2));
        timer.record(Duration::from_millis(6));
        timer.record(Duration::from_millis(4));
        assert_eq!(timer.average(), Duration::from_millis(4));
        assert_eq!(timer.max(), Duration::from_millis(6));
        assert_eq!(timer.last(), Some(Duration::from_millis(4)));
    }

    #[test]
    fn oldest_sample_is_dropped() {
        let mut timer = StepTimer::new(2);
        timer.record(Duration::from_millis(100));
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.max(), Duration::from_millis(20));
        assert_eq!(timer.average(), Duration::from_millis(15));
    }
}
