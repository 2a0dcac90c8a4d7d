//! One-way readiness latch
//!
//! Consumers must not read the task list before the initial load has
//! completed, so the state manager exposes readiness as a one-shot latch:
//! false until the load finishes, then true for the rest of the process
//! lifetime. Callbacks registered before the flip fire exactly once when it
//! happens; callbacks registered after fire immediately.

use tracing::debug;

type ReadyCallback = Box<dyn FnOnce() + Send>;

/// One-shot boolean latch with fire-once callbacks
#[derive(Default)]
pub struct ReadyLatch {
    ready: bool,
    waiters: Vec<ReadyCallback>,
}

impl ReadyLatch {
    /// Create a latch in the not-ready state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latch has fired
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Register a callback to run once the latch fires
    ///
    /// Runs immediately if the latch already fired.
    pub fn subscribe(&mut self, callback: impl FnOnce() + Send + 'static) {
        if self.ready {
            debug!("ReadyLatch::subscribe: already ready, firing immediately");
            callback();
        } else {
            self.waiters.push(Box::new(callback));
        }
    }

    /// Flip the latch to ready and drain waiters in registration order
    ///
    /// The transition happens at most once; later calls are no-ops.
    pub fn notify(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        let waiters = std::mem::take(&mut self.waiters);
        debug!(count = waiters.len(), "ReadyLatch::notify: firing waiters");
        for waiter in waiters {
            waiter();
        }
    }
}
