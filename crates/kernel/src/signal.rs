use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct SignalState {
    resolved: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// Completion handle for a world's death animation.
///
/// Resolves exactly once, on the tick that takes the world to
/// [`crate::LifecycleState::Dead`]. Clones observe the same resolution. The
/// handle can be polled with [`DeathSignal::is_resolved`] or awaited.
#[derive(Debug, Clone, Default)]
pub struct DeathSignal {
    state: Rc<SignalState>,
}

impl DeathSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.state.resolved.get()
    }

    /// Whether both handles belong to the same death.
    pub fn same_as(&self, other: &DeathSignal) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Returns false if the signal had already resolved.
    pub(crate) fn resolve(&self) -> bool {
        if self.state.resolved.replace(true) {
            return false;
        }
        if let Some(waker) = self.state.waker.borrow_mut().take() {
            waker.wake();
        }
        true
    }
}

impl Future for DeathSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.state.resolved.get() {
            return Poll::Ready(());
        }
        *self.state.waker.borrow_mut() = Some(cx.waker().clone());
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once() {
        let signal = DeathSignal::new();
        assert!(!signal.is_resolved());
        assert!(signal.resolve());
        assert!(!signal.resolve());
        assert!(signal.is_resolved());
    }

    #[test]
    fn clones_share_resolution() {
        let signal = DeathSignal::new();
        let observer = signal.clone();
        assert!(observer.same_as(&signal));
        signal.resolve();
        assert!(observer.is_resolved());
        assert!(!DeathSignal::new().same_as(&signal));
    }

    #[test]
    fn pending_until_resolved() {
        let mut signal = DeathSignal::new();
        let mut cx = Context::from_waker(Waker::noop());
        assert!(Pin::new(&mut signal).poll(&mut cx).is_pending());
        signal.resolve();
        assert!(Pin::new(&mut signal).poll(&mut cx).is_ready());
    }

    #[test]
    fn awaitable_after_resolution() {
        let signal = DeathSignal::new();
        signal.resolve();
        pollster::block_on(signal);
    }
}
