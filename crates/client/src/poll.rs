//! Fixed-interval polling with runtime enable/disable.
//!
//! [`Poller`] owns a background task that invokes a callback on a fixed
//! interval while enabled. Enabling fires the callback immediately and
//! restarts the interval from that point; disabling pauses without tearing
//! the task down. Each invocation runs as its own task, so a slow request
//! never delays the next tick.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Handle to a background polling task.
///
/// Dropping the handle cancels the task.
pub struct Poller {
    cancel: CancellationToken,
    enabled: watch::Sender<bool>,
}

impl Poller {
    /// Spawn the polling task.
    ///
    /// When `enabled` is true the first call happens immediately, then once
    /// per `interval` until disabled or shut down.
    pub fn spawn<F, Fut>(interval: Duration, enabled: bool, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (enabled_tx, mut enabled_rx) = watch::channel(enabled);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            loop {
                // Park until enabled.
                while !*enabled_rx.borrow() {
                    tokio::select! {
                        _ = token.cancelled() => return,
                        changed = enabled_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }

                // A fresh interval per enablement: the first tick completes
                // immediately, so enabling always refreshes right away.
                let mut ticker = tokio::time::interval(interval);
                loop {
                    tokio::select! {
                        _ = token.cancelled() => return,
                        changed = enabled_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            if !*enabled_rx.borrow() {
                                break;
                            }
                        }
                        _ = ticker.tick() => {
                            tokio::spawn(tick());
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            enabled: enabled_tx,
        }
    }

    /// Pause or resume polling. Resuming fires the callback immediately.
    pub fn set_enabled(&self, enabled: bool) {
        let _ = self.enabled.send(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    /// Stop the polling task permanently.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TICK: Duration = Duration::from_millis(5000);

    fn counting_poller(enabled: bool) -> (Poller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let poller = Poller::spawn(TICK, enabled, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (poller, count)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_when_enabled() {
        let (_poller, count) = counting_poller(true);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_interval() {
        let (_poller, count) = counting_poller(true);

        tokio::time::sleep(Duration::from_millis(1)).await;
        tokio::time::sleep(TICK).await;
        tokio::time::sleep(TICK).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_poller_stays_silent() {
        let (poller, count) = counting_poller(false);

        tokio::time::sleep(TICK).await;
        tokio::time::sleep(TICK).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(poller);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_stops_and_reenabling_fires_immediately() {
        let (poller, count) = counting_poller(true);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        poller.set_enabled(false);
        tokio::time::sleep(TICK).await;
        tokio::time::sleep(TICK).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        poller.set_enabled(true);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let (poller, count) = counting_poller(true);
        tokio::time::sleep(Duration::from_millis(1)).await;

        poller.shutdown();
        tokio::time::sleep(TICK).await;
        tokio::time::sleep(TICK).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
