//! Cancellable visual delays.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// At most one outstanding delay. Starting a new one aborts the previous.
///
/// The delay only affects presentation; nothing that loads or writes data
/// waits on it.
#[derive(Debug, Default)]
pub struct VisualDelay {
    pending: Option<JoinHandle<()>>,
}

impl VisualDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `steps` in the background in place of any pending delay.
    pub fn start<F>(&mut self, steps: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(steps));
    }

    /// Runs `action` once `delay` has elapsed, in place of any pending delay.
    pub fn after<A>(&mut self, delay: Duration, action: A)
    where
        A: FnOnce() + Send + 'static,
    {
        self.start(async move {
            tokio::time::sleep(delay).await;
            action();
        });
    }

    /// Aborts the pending delay. Returns true if one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    /// Returns true while a delay is running.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for VisualDelay {
    fn drop(&mut self) {
        self.cancel();
    }
}
