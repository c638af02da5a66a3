use std::time::Instant;

use pixelswarm_kernel::ConfigError;

use crate::host::{FrameHost, FrameToken, HeadlessHost};
use crate::timer::StepTimer;

/// Decouples the simulation rate from the host's callback rate.
///
/// Each delivered callback computes `floor(elapsed / interval)` since the
/// start epoch and runs the step only if that frame index advanced. A fast
/// host skips redundant callbacks; a slow host gets one step per callback
/// and the simulation runs slow rather than multi-stepping.
#[derive(Debug)]
pub struct FrameDriver<H: FrameHost> {
    host: H,
    frame_interval_ms: f64,
    running: bool,
    pending: Option<FrameToken>,
    epoch_ms: f64,
    frame_index: Option<u64>,
    steps_run: u64,
    timer: StepTimer,
}

impl<H: FrameHost> FrameDriver<H> {
    pub fn new(host: H, frame_rate: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            host,
            frame_interval_ms: frame_interval(frame_rate)?,
            running: false,
            pending: None,
            epoch_ms: 0.0,
            frame_index: None,
            steps_run: 0,
            timer: StepTimer::default(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Change the target rate. Restarts the timing epoch so the new interval
    /// is measured from now.
    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<(), ConfigError> {
        self.frame_interval_ms = frame_interval(frame_rate)?;
        self.epoch_ms = self.host.now_ms();
        self.frame_index = None;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a fresh timing epoch and request the first callback. No-op when
    /// already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.epoch_ms = self.host.now_ms();
        self.frame_index = None;
        self.pending = Some(self.host.request_frame());
        tracing::debug!(epoch_ms = self.epoch_ms, "frame driver started");
    }

    /// Cancel the pending callback. No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(token) = self.pending.take() {
            self.host.cancel_frame(token);
        }
        self.frame_index = None;
        tracing::debug!(steps = self.steps_run, "frame driver stopped");
    }

    /// Handle a host callback. Returns true if `step` ran.
    ///
    /// Tokens other than the one currently pending are stale and ignored.
    pub fn on_frame<F>(&mut self, token: FrameToken, step: F) -> bool
    where
        F: FnOnce(),
    {
        if !self.running || self.pending != Some(token) {
            return false;
        }
        self.pending = None;

        let elapsed = (self.host.now_ms() - self.epoch_ms).max(0.0);
        let index = (elapsed / self.frame_interval_ms).floor() as u64;
        let due = self.frame_index.is_none_or(|last| index > last);
        if due {
            let _span = tracing::info_span!("frame_step", index).entered();
            let started = Instant::now();
            step();
            self.timer.record(started.elapsed());
            self.steps_run += 1;
            self.frame_index = Some(index);
        }

        self.pending = Some(self.host.request_frame());
        due
    }

    /// Target-rate frame index of the last step in this epoch.
    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    /// Steps run over the driver's whole life.
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }

    pub fn timer(&self) -> &StepTimer {
        &self.timer
    }
}

impl FrameDriver<HeadlessHost> {
    /// Deliver `callbacks` host callbacks spaced `host_interval_ms` apart,
    /// starting at the current host time. Returns the number of steps run.
    pub fn run_headless<F>(&mut self, callbacks: usize, host_interval_ms: f64, mut step: F) -> u64
    where
        F: FnMut(),
    {
        let before = self.steps_run;
        for _ in 0..callbacks {
            for token in self.host.take_pending() {
                self.on_frame(token, &mut step);
            }
            self.host.advance(host_interval_ms);
        }
        self.steps_run - before
    }
}

fn frame_interval(frame_rate: f64) -> Result<f64, ConfigError> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(1000.0 / frame_rate)
    } else {
        Err(ConfigError::InvalidFrameRate(frame_rate))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn driver(frame_rate: f64) -> FrameDriver<HeadlessHost> {
        FrameDriver::new(HeadlessHost::new(), frame_rate).unwrap()
    }

    fn deliver(driver: &mut FrameDriver<HeadlessHost>, steps: &Cell<u32>) -> bool {
        let tokens = driver.host_mut().take_pending();
        let mut ran = false;
        for token in tokens {
            ran |= driver.on_frame(token, || steps.set(steps.get() + 1));
        }
        ran
    }

    #[test]
    fn rejects_invalid_frame_rate() {
        assert!(FrameDriver::new(HeadlessHost::new(), 0.0).is_err());
        assert!(FrameDriver::new(HeadlessHost::new(), f64::NAN).is_err());
        let mut d = driver(30.0);
        assert_eq!(
            d.set_frame_rate(-2.0),
            Err(ConfigError::InvalidFrameRate(-2.0))
        );
        assert_eq!(d.frame_interval_ms(), 1000.0 / 30.0);
    }

    #[test]
    fn first_callback_always_steps() {
        let mut d = driver(25.0);
        let steps = Cell::new(0);
        d.start();
        assert!(deliver(&mut d, &steps));
        assert_eq!(steps.get(), 1);
        assert_eq!(d.frame_index(), Some(0));
    }

    #[test]
    fn fast_host_skips_redundant_callbacks() {
        // 40 ms frames, host every 20 ms
        let mut d = driver(25.0);
        let steps = Cell::new(0);
        d.start();
        for _ in 0..10 {
            deliver(&mut d, &steps);
            d.host_mut().advance(20.0);
        }
        assert_eq!(steps.get(), 5);
        assert_eq!(d.frame_index(), Some(4));
    }

    #[test]
    fn slow_host_never_catches_up() {
        let mut d = driver(25.0);
        let steps = Cell::new(0);
        d.start();
        for _ in 0..5 {
            deliver(&mut d, &steps);
            d.host_mut().advance(200.0);
        }
        assert_eq!(steps.get(), 5);
        assert_eq!(d.frame_index(), Some(20));
    }

    #[test]
    fn start_twice_keeps_one_request() {
        let mut d = driver(30.0);
        d.start();
        d.start();
        assert!(d.is_running());
        assert_eq!(d.host().pending().len(), 1);
    }

    #[test]
    fn stop_cancels_pending_and_ignores_stale_tokens() {
        let mut d = driver(30.0);
        d.start();
        let token = d.host().pending()[0];
        d.stop();
        d.stop();
        assert!(!d.is_running());
        assert!(d.host().pending().is_empty());
        assert_eq!(d.host().cancelled(), &[token]);
        assert!(!d.on_frame(token, || panic!("stale token stepped")));
    }

    #[test]
    fn restart_begins_fresh_epoch() {
        let mut d = driver(25.0);
        let steps = Cell::new(0);
        d.start();
        deliver(&mut d, &steps);
        d.host_mut().advance(100.0);
        deliver(&mut d, &steps);
        assert_eq!(d.frame_index(), Some(2));
        d.stop();

        d.host_mut().advance(1000.0);
        d.start();
        assert!(deliver(&mut d, &steps));
        assert_eq!(d.frame_index(), Some(0));
        d.host_mut().advance(10.0);
        assert!(!deliver(&mut d, &steps));
        assert_eq!(steps.get(), 3);
        assert_eq!(d.steps_run(), 3);
    }

    #[test]
    fn each_callback_requests_the_next() {
        let mut d = driver(25.0);
        let steps = Cell::new(0);
        d.start();
        deliver(&mut d, &steps);
        assert_eq!(d.host().pending().len(), 1);
        deliver(&mut d, &steps);
        assert_eq!(d.host().pending().len(), 1);
    }

    #[test]
    fn run_headless_counts_steps_and_records_timings() {
        let mut d = driver(30.0);
        d.start();
        let mut ticks = 0;
        let ran = d.run_headless(8, 50.0, || ticks += 1);
        assert_eq!(ran, 8);
        assert_eq!(ticks, 8);
        assert_eq!(d.timer().count(), 8);
    }

    #[test]
    fn run_headless_without_start_does_nothing() {
        let mut d = driver(30.0);
        assert_eq!(d.run_headless(5, 50.0, || {}), 0);
    }
}
