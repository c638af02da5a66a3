/// Handle for one requested host callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Cooperative scheduler supplied by the host (a display loop, a timer, or a
/// test clock).
///
/// The host calls [`crate::FrameDriver::on_frame`] with the token it handed
/// out once the requested callback is due.
pub trait FrameHost {
    /// Ask for one callback.
    fn request_frame(&mut self) -> FrameToken;
    /// Withdraw a request. Unknown or already-delivered tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
    /// Monotonic host time in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Manual clock and request queue for headless runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    now_ms: f64,
    next_token: u64,
    pending: Vec<FrameToken>,
    cancelled: Vec<FrameToken>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn set_time(&mut self, ms: f64) {
        self.now_ms = ms;
    }

    /// Requests not yet delivered, oldest first.
    pub fn pending(&self) -> &[FrameToken] {
        &self.pending
    }

    /// Remove and return every outstanding request for delivery.
    pub fn take_pending(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }

    /// Every token cancelled so far.
    pub fn cancelled(&self) -> &[FrameToken] {
        &self.cancelled
    }
}

impl FrameHost for HeadlessHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Some(index) = self.pending.iter().position(|t| *t == token) {
            self.pending.remove(index);
            self.cancelled.push(token);
        }
    }

    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
