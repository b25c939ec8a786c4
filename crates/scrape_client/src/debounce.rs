use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::lock;

/// Trailing-edge debounce: `func` runs once `wait` has passed without another
/// [`Debounce::call`], with the argument of the last call.
pub struct Debounce<T> {
    wait: Duration,
    func: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debounce<T> {
    pub fn new(wait: Duration, func: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            wait,
            func: Arc::new(func),
            pending: Mutex::new(None),
        }
    }

    /// Restarts the timer. Must be called from within a Tokio runtime.
    pub fn call(&self, value: T) {
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let func = Arc::clone(&self.func);
        let wait = self.wait;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            func(value);
        }));
    }

    /// Drops a pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }
    }
}
