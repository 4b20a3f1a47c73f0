//! Conversation transcript — append-only log with broadcast to subscribers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::markdown::{self, Document};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Agent,
    User,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Identifier of a transcript entry. Strictly increasing in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    /// Raw text; may contain markdown-lite markup.
    pub text: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Render the entry's text for display.
    pub fn render(&self) -> Document {
        markdown::render(&self.text)
    }
}

struct Log {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

/// Append-only transcript shared between the conversation view and whichever
/// flow is currently writing to it.
///
/// Entries are never edited, removed or reordered.
pub struct Transcript {
    log: RwLock<Log>,
    tx: broadcast::Sender<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            log: RwLock::new(Log {
                entries: Vec::new(),
                next_id: 1,
            }),
            tx,
        })
    }

    /// Append an agent-authored entry.
    pub async fn append_agent(&self, text: impl Into<String>) -> TranscriptEntry {
        self.append(Origin::Agent, text.into()).await
    }

    /// Append a user-authored entry.
    pub async fn append_user(&self, text: impl Into<String>) -> TranscriptEntry {
        self.append(Origin::User, text.into()).await
    }

    async fn append(&self, origin: Origin, text: String) -> TranscriptEntry {
        let entry = {
            let mut log = self.log.write().await;
            let entry = TranscriptEntry {
                id: EntryId(log.next_id),
                text,
                origin,
                created_at: Utc::now(),
            };
            log.next_id += 1;
            log.entries.push(entry.clone());
            // Broadcast under the lock so subscribers see append order.
            let _ = self.tx.send(entry.clone());
            entry
        };

        debug!(entry_id = %entry.id, origin = %entry.origin, "Transcript entry appended");
        entry
    }

    /// Snapshot of all entries in append order.
    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.log.read().await.entries.clone()
    }

    /// The most recently appended entry.
    pub async fn last(&self) -> Option<TranscriptEntry> {
        self.log.read().await.entries.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.log.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.entries.is_empty()
    }

    /// Subscribe to entries appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEntry> {
        self.tx.subscribe()
    }

    /// Subscribe as a stream. Lagged receivers yield an error item instead of
    /// silently skipping.
    pub fn stream(&self) -> BroadcastStream<TranscriptEntry> {
        BroadcastStream::new(self.subscribe())
    }
}
