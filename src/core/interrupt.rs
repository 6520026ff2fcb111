use std::sync::Arc;
use tokio::sync::watch;

/// Fires once the user asks the export to stop (Ctrl-C).
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

/// Sending side of an [`Interrupt`].
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Interrupt {
    pub fn channel() -> (InterruptHandle, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx: Arc::new(tx) }, Interrupt { rx })
    }

    /// An interrupt nobody can trigger.
    pub fn never() -> Self {
        let (_handle, interrupt) = Self::channel();
        interrupt
    }

    /// Triggers on SIGINT. Must be called from inside a tokio runtime.
    pub fn listen_for_ctrl_c() -> Self {
        let (handle, interrupt) = Self::channel();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("KeyboardInterrupt");
                    handle.trigger();
                }
                Err(e) => tracing::warn!("Cannot listen for Ctrl-C: {}", e),
            }
        });
        interrupt
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when triggered. Never resolves if every handle is gone.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl InterruptHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}
