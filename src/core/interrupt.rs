//! Interrupt signal sources for supervised runs.
//!
//! A [`Runner`](crate::core::Runner) consumes interrupts through an
//! [`InterruptSource`] rather than touching OS signal delivery directly, so
//! tests can inject synthetic interrupts deterministically and embedders can
//! wire in their own delivery mechanism.

use crossbeam_channel::{never, unbounded, Receiver, Sender};

/// Handle for delivering synthetic interrupts to a paired
/// [`InterruptSource`].
///
/// Cloneable; every clone feeds the same source.
#[derive(Debug, Clone)]
pub struct InterruptTrigger {
    tx: Sender<()>,
}

impl InterruptTrigger {
    /// Deliver one interrupt.
    ///
    /// The feed is unbounded, so rapid successive deliveries are never
    /// coalesced; each one is observed separately by the consumer. Delivery
    /// after the source has been dropped is a no-op.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

/// A stream of interrupt notifications consumed by a runner.
#[derive(Debug)]
pub struct InterruptSource {
    rx: Receiver<()>,
}

impl InterruptSource {
    /// A source that never fires.
    #[must_use]
    pub fn disabled() -> Self {
        Self { rx: never() }
    }

    /// A source paired with a trigger for deterministic synthetic delivery.
    #[must_use]
    pub fn manual() -> (InterruptTrigger, Self) {
        let (tx, rx) = unbounded();
        (InterruptTrigger { tx }, Self { rx })
    }

    /// A source backed by the process's Ctrl-C / SIGINT delivery.
    ///
    /// Spawns a dedicated listener thread with its own single-threaded tokio
    /// runtime that loops on [`tokio::signal::ctrl_c`], forwarding each
    /// delivery into the source. The listener exits when the source is
    /// dropped.
    #[cfg(feature = "tokio-runtime")]
    #[must_use]
    pub fn ctrl_c() -> Self {
        use tracing::{debug, error};

        let (tx, rx) = unbounded();

        let spawned = std::thread::Builder::new()
            .name("foreman-signals".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!(error = %e, "failed to create signal listener runtime");
                        return;
                    }
                };

                rt.block_on(async move {
                    loop {
                        if tokio::signal::ctrl_c().await.is_err() {
                            error!("ctrl-c listener registration failed, exiting");
                            break;
                        }
                        debug!("interrupt signal received");
                        if tx.send(()).is_err() {
                            // Source dropped; nobody is listening anymore.
                            break;
                        }
                    }
                });
            });

        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn signal listener thread");
        }

        Self { rx }
    }

    /// Consume the source, yielding its raw receiver.
    pub(crate) fn into_receiver(self) -> Receiver<()> {
        self.rx
    }
}
