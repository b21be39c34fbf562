use crate::core::window::Window;

/// Observer notified each time a context's window fills up
///
/// Implement this trait to react to observed throughput, e.g. a governor
/// that adjusts clock speed once per window.
///
/// # Contract
///
/// With [`CallbackDispatch::Locked`](crate::CallbackDispatch::Locked) the
/// handler runs while the context lock is held. It sees a consistent window
/// that no other thread can mutate, but it must not call `heartbeat()` (or
/// any other locking method) on the same context: the lock is not reentrant
/// and the call would deadlock. Slow handlers stall every producer thread.
pub trait WindowCompleteHandler: Send + Sync + 'static {
    /// Called exactly once per `capacity` accepted heartbeats
    ///
    /// # Arguments
    /// * `window` - Read-only view of the window that just filled
    fn on_window_complete(&self, window: &Window);
}

impl<F> WindowCompleteHandler for F
where
    F: Fn(&Window) + Send + Sync + 'static,
{
    fn on_window_complete(&self, window: &Window) {
        self(window)
    }
}

/// A handler that ignores window completion
pub struct NoOpHandler;

impl WindowCompleteHandler for NoOpHandler {
    fn on_window_complete(&self, _window: &Window) {}
}
