//! Broadcast-based change feed for ledger writes.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Team;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventKind {
    EntryInserted,
    EntryUpdated,
    EntryDeleted,
}

/// A row-level change notification. Carries no payload; consumers
/// re-query what they need.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LedgerEvent {
    pub kind: LedgerEventKind,
    pub team: Option<Team>,
    pub entry_id: Uuid,
}

/// In-process change feed. `publish` never awaits; slow receivers lag
/// and drop events rather than blocking the writer. Subscriptions end
/// when the receiver is dropped, so a torn-down view leaks nothing.
#[derive(Clone)]
pub struct LedgerFeed {
    tx: broadcast::Sender<LedgerEvent>,
}

impl LedgerFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns the number of receivers that saw the event.
    pub fn publish(&self, event: LedgerEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LedgerFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let feed = LedgerFeed::new();
        let mut rx = feed.subscribe();

        let delivered = feed.publish(LedgerEvent {
            kind: LedgerEventKind::EntryInserted,
            team: Some(Team::Blue),
            entry_id: Uuid::new_v4(),
        });
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, LedgerEventKind::EntryInserted);
        assert_eq!(event.team, Some(Team::Blue));
    }

    #[tokio::test]
    async fn dropped_receiver_unsubscribes() {
        let feed = LedgerFeed::new();
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(rx);
        assert_eq!(feed.subscriber_count(), 0);
        let delivered = feed.publish(LedgerEvent {
            kind: LedgerEventKind::EntryDeleted,
            team: None,
            entry_id: Uuid::new_v4(),
        });
        assert_eq!(delivered, 0);
    }
}
