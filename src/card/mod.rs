//! Per-link OGP card state machine.
//!
//! ```text
//! Idle --start--> Loading --ok--> Loaded(metadata)
//!                         \--err/timeout--> Failed(reason)
//! ```
//!
//! A card owns its state through a `watch` channel. The fetch runs as a
//! spawned task that delivers exactly one transition back into that channel,
//! unless the card was torn down first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::models::{CardState, LinkTarget};
use crate::ogp::OgpProvider;

/// Index of a card in its page's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub usize);

pub struct OgpCard {
    id: CardId,
    target: LinkTarget,
    state: Arc<watch::Sender<CardState>>,
    provider: Arc<dyn OgpProvider>,
    fetch_timeout: Duration,
    cancel: CancellationToken,
}

impl OgpCard {
    pub fn new(
        id: CardId,
        target: LinkTarget,
        provider: Arc<dyn OgpProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(CardState::Idle);
        Self {
            id,
            target,
            state: Arc::new(state),
            provider,
            fetch_timeout,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// Move Idle to Loading and spawn the fetch.
    ///
    /// Returns `true` only for the call that started the fetch. Repeated or
    /// concurrent calls, and calls after teardown, do nothing. Must be called
    /// from within a tokio runtime.
    pub fn start(&self) -> bool {
        if self.cancel.is_cancelled() {
            tracing::debug!(card = self.id.0, url = %self.target, "start after teardown ignored");
            return false;
        }

        let started = self.state.send_if_modified(|state| match state {
            CardState::Idle if !self.cancel.is_cancelled() => {
                *state = CardState::Loading;
                true
            }
            _ => false,
        });
        if !started {
            return false;
        }

        tracing::debug!(card = self.id.0, url = %self.target, "card loading");
        tokio::spawn(run_fetch(
            self.id,
            self.target.clone(),
            Arc::clone(&self.provider),
            Arc::clone(&self.state),
            self.cancel.clone(),
            self.fetch_timeout,
        ));
        true
    }

    /// Snapshot of the current state; valid at any point, including mid-flight.
    pub fn state(&self) -> CardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CardState> {
        self.state.subscribe()
    }

    /// Wait for a terminal state.
    ///
    /// Returns the current state right away when the card was never started
    /// or has been torn down, since neither will ever reach a terminal state.
    pub async fn settled(&self) -> CardState {
        if matches!(*self.state.borrow(), CardState::Idle) {
            return CardState::Idle;
        }

        let mut rx = self.state.subscribe();
        tokio::select! {
            result = rx.wait_for(CardState::is_terminal) => match result {
                Ok(state) => state.clone(),
                Err(_) => self.state(),
            },
            _ = self.cancel.cancelled() => self.state(),
        }
    }

    /// Cancel any in-flight fetch. The state is frozen from here on.
    pub fn teardown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        tracing::debug!(card = self.id.0, url = %self.target, "card torn down");
        // Under the state lock, so it orders against a pending transition.
        self.state.send_if_modified(|_| {
            self.cancel.cancel();
            false
        });
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for OgpCard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for OgpCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OgpCard")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("state", &*self.state.borrow())
            .field("torn_down", &self.cancel.is_cancelled())
            .finish()
    }
}

async fn run_fetch(
    id: CardId,
    target: LinkTarget,
    provider: Arc<dyn OgpProvider>,
    state: Arc<watch::Sender<CardState>>,
    cancel: CancellationToken,
    fetch_timeout: Duration,
) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(card = id.0, url = %target, "fetch dropped on teardown");
            return;
        }
        result = tokio::time::timeout(fetch_timeout, provider.fetch(&target)) => {
            result.unwrap_or(Err(FetchError::Timeout))
        }
    };

    let next = match outcome {
        Ok(metadata) => {
            tracing::info!(card = id.0, url = %target, title = metadata.title(), "OGP card loaded");
            CardState::Loaded(metadata)
        }
        Err(e) => {
            tracing::warn!(card = id.0, url = %target, error = %e, "OGP card failed");
            CardState::Failed(e.reason())
        }
    };

    // Checked under the channel lock, which teardown also takes, so a card
    // torn down at any point before this never publishes. Only Loading may
    // advance; a terminal state is never overwritten.
    state.send_if_modified(move |current| {
        if cancel.is_cancelled() || !matches!(current, CardState::Loading) {
            return false;
        }
        *current = next;
        true
    });
}
