//! Single-shot debounce timer.
//!
//! Every pushed value re-arms the timer. Once the quiet period passes with no
//! new value, the latest one is handed to the settle handler in its own task,
//! so a slow handler never delays the next window and handlers may overlap.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Debounces values pushed from any thread.
///
/// Dropping the debouncer stops the timer task and discards a pending value.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the timer task. Must be called within a tokio runtime.
    pub fn spawn<F, Fut>(quiet: Duration, on_settle: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, quiet, on_settle));
        Self { tx, task }
    }

    /// Push a value, re-arming the timer. Returns false if the task is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T, F, Fut>(mut rx: mpsc::UnboundedReceiver<T>, quiet: Duration, on_settle: F)
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(value) => latest = value,
                    None => return,
                },
                _ = tokio::time::sleep(quiet) => break,
            }
        }

        tokio::spawn(on_settle(latest));
    }
}
