use scms_domain::PersistenceKey;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Which slot of a slice a mutation replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeTarget {
    Item,
    Collection,
    /// One static entry; its key is the change's persistence key.
    Static,
}

/// Published after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceChange {
    /// Singular name of the content type.
    pub content_type: String,
    pub target: ChangeTarget,
    pub persistence_key: PersistenceKey,
}

/// A live feed of [`SliceChange`]s. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<Arc<SliceChange>>,
}

impl Subscription {
    pub(crate) const fn new(receiver: broadcast::Receiver<Arc<SliceChange>>) -> Self {
        Self { receiver }
    }

    /// Waits for the next change; `None` once the store is gone.
    ///
    /// A subscriber that fell behind skips to the oldest change still retained.
    pub async fn recv(&mut self) -> Option<Arc<SliceChange>> {
        let mut skipped = 0u64;

        loop {
            match self.receiver.recv().await {
                Ok(change) => {
                    if skipped > 0 {
                        warn!(
                            skipped,
                            "Store subscriber lagged; continuing from oldest retained change"
                        );
                    }
                    return Some(change);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(skipped = n, total_skipped = skipped, "Store subscriber lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next change if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<SliceChange>> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(skipped = n, "Store subscriber lagged; continuing from latest change");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
