// src/exec/cancel.rs

//! Cooperative cancellation shared between the executor and running actions.
//!
//! [`CancelSignal`] is held by the executor and fires at most once;
//! [`CancelToken`]s are cheap clones handed to every action invocation so it
//! can stop its subprocess. The signal only ever goes from "not cancelled" to
//! "cancelled".

use tokio::sync::watch;

#[derive(Debug)]
pub struct CancelSignal {
    tx: watch::Sender<bool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Raise the signal. Returns `true` only for the call that raised it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal is raised. Never resolves if the owning
    /// [`CancelSignal`] is dropped without being raised.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_fires_once() {
        let signal = CancelSignal::new();
        let token = signal.token();
        assert!(!token.is_cancelled());
        assert!(signal.cancel());
        assert!(!signal.cancel());
        assert!(token.is_cancelled());
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_for_tokens_taken_before_and_after() {
        let signal = CancelSignal::new();
        let early = signal.token();
        signal.cancel();
        let late = signal.token();

        tokio::time::timeout(Duration::from_secs(1), early.cancelled())
            .await
            .expect("early token resolves");
        tokio::time::timeout(Duration::from_secs(1), late.cancelled())
            .await
            .expect("late token resolves");
    }

    #[tokio::test]
    async fn never_token_does_not_resolve() {
        let token = CancelToken::never();
        let res = tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
        assert!(res.is_err());
        assert!(!token.is_cancelled());
    }
}
