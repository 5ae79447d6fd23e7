pub mod memory;

use std::{
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::document::{Document, FieldMap},
};

pub use memory::MemoryStore;

/// Collection names owned by the platform.
pub struct Collection;

impl Collection {
    pub const USERS: &'static str = "users";
    pub const RATINGS: &'static str = "ratings";
    pub const EVENTS: &'static str = "events";
    pub const MESSAGES: &'static str = "messages";
}

/// AND-combined equality filters on named fields. The reserved name `id`
/// matches the document identifier rather than a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    clauses: Vec<(String, Value)>,
}

impl Predicate {
    /// Matches every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            clauses: vec![(name.into(), value.into())],
        }
    }

    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((name.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(name, value)| match name.as_str() {
            "id" => Value::String(doc.id.to_string()) == *value,
            _ => doc.field(name) == Some(value),
        })
    }
}

/// Full matching record set (or failure) delivered to a subscriber.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    Data(Vec<Document>),
    Error(AppError),
}

/// Standing subscription handle. Once stopped (or dropped) no further
/// snapshot is yielded, including one already queued at teardown time.
#[derive(Debug)]
pub struct Subscription {
    live: Arc<AtomicBool>,
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
}

/// Producer half of a subscription, held by the store.
#[derive(Debug, Clone)]
pub struct SubscriptionSink {
    tx: mpsc::UnboundedSender<SnapshotEvent>,
    live: Arc<AtomicBool>,
}

impl Subscription {
    /// A subscription fed through the returned sink.
    pub fn channel() -> (SubscriptionSink, Subscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        let live = Arc::new(AtomicBool::new(true));
        (
            SubscriptionSink {
                tx,
                live: live.clone(),
            },
            Subscription { live, rx },
        )
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Next delivered event, `None` after teardown.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        if !self.live.load(Ordering::Acquire) {
            return None;
        }
        let event = self.rx.recv().await?;
        // Liveness is re-checked so an in-flight snapshot cannot land
        // after teardown
        if self.live.load(Ordering::Acquire) {
            Some(event)
        } else {
            None
        }
    }

    pub fn stop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
    }
}

impl Stream for Subscription {
    type Item = SnapshotEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if !self.live.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) if self.live.load(Ordering::Acquire) => {
                Poll::Ready(Some(event))
            }
            Poll::Ready(_) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl SubscriptionSink {
    /// Deliver an event; returns false once the consumer is gone.
    pub fn send(&self, event: SnapshotEvent) -> bool {
        self.live.load(Ordering::Acquire) && self.tx.send(event).is_ok()
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Backing document store: named collections of field bags with equality
/// queries and snapshot subscriptions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_one(&self, collection: &str, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Write fields at a known id, creating the document if absent. With
    /// `merge`, existing fields not named in `fields` are kept; otherwise
    /// the document is replaced.
    async fn write_one(
        &self,
        collection: &str,
        id: Uuid,
        fields: FieldMap,
        merge: bool,
    ) -> Result<(), AppError>;

    /// Create a document under a store-generated id.
    async fn create_one(&self, collection: &str, fields: FieldMap) -> Result<Uuid, AppError>;

    async fn delete_one(&self, collection: &str, id: Uuid) -> Result<(), AppError>;

    /// All matching documents, in insertion order.
    async fn query(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> Result<Vec<Document>, AppError>;

    /// Standing subscription delivering the full matching set immediately
    /// and again on every subsequent change.
    async fn subscribe(
        &self,
        collection: &str,
        predicate: Predicate,
    ) -> Result<Subscription, AppError>;
}
