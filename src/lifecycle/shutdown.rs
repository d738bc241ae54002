//! Shutdown coordination for the dev server.
//!
//! `Shutdown` is the trigger side, held by whoever decides when to stop
//! (`main` on Ctrl+C, tests explicitly). The dev server only ever sees a
//! [`ShutdownSignal`].

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Trigger side of a graceful shutdown.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A signal that resolves once this coordinator triggers or is dropped.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Stop every server holding a signal from this coordinator.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no server listening");
        }
    }

    /// Trigger on the first Ctrl+C.
    ///
    /// If the handler cannot be installed the task logs and exits; the
    /// server then only stops through [`Shutdown::trigger`].
    pub fn trigger_on_ctrl_c(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Ctrl+C received");
                    shutdown.trigger();
                }
                Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
            }
        })
    }

    /// Number of signals not yet resolved or dropped.
    pub fn pending_signals(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side handed to [`DevServer::run`](crate::DevServer::run).
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered or every coordinator is gone.
    pub async fn wait(mut self) {
        // A lagged receiver has missed a trigger, which still means stop.
        let _ = self.rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn trigger_resolves_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        assert_eq!(shutdown.pending_signals(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("signal did not resolve");
        assert_eq!(shutdown.pending_signals(), 0);
    }

    #[tokio::test]
    async fn dropping_coordinator_resolves_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("signal did not resolve");
    }

    #[tokio::test]
    async fn untriggered_signal_stays_pending() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn trigger_without_signals_is_harmless() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        // A signal taken after the trigger does not see it.
        let signal = shutdown.signal();
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("signal did not resolve");
    }
}
