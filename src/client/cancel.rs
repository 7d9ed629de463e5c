//! Request Cancellation
//!
//! A cloneable handle that aborts in-flight requests when a view is left or
//! the client shuts down.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

/// Cancellation handle threaded through every API call.
///
/// Clones share the same signal; cancelling any clone cancels them all. A
/// [`child`](CancelToken::child) token is also cancelled when its parent is,
/// but cancelling the child leaves the parent untouched.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            parent: None,
        }
    }

    /// New token cancelled by either its own `cancel` or this token's
    pub fn child(&self) -> Self {
        Self {
            parent: Some(Arc::new(self.clone())),
            ..Self::new()
        }
    }

    /// Signal cancellation to every holder of this token and its children
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// Resolve once this token or any ancestor is cancelled
    pub fn cancelled(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let mut rx = self.rx.clone();
            let own = async move {
                // The sender is owned by this token, so it outlives the wait.
                let _ = rx.wait_for(|cancelled| *cancelled).await;
            };

            match &self.parent {
                None => own.await,
                Some(parent) => {
                    tokio::select! {
                        _ = own => {}
                        _ = parent.cancelled() => {}
                    }
                }
            }
        })
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
