use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::document::{Document, FieldMap},
};

use super::{DocumentStore, Predicate, SnapshotEvent, Subscription, SubscriptionSink};

pub type SharedCollections = Arc<Mutex<HashMap<String, Vec<Document>>>>;

pub type SubscriberList = Arc<Mutex<Vec<Subscriber>>>;

#[derive(Debug, Clone)]
pub struct Subscriber {
    collection: String,
    predicate: Predicate,
    sink: SubscriptionSink,
}

/// In-process document store. Each collection is an insertion-ordered
/// list of documents; every mutation pushes a fresh full snapshot to each
/// live subscriber on that collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: SharedCollections,
    subscribers: SubscriberList,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn publish(&self, collection: &str) {
        let docs = {
            let collections = self.collections.lock().await;
            collections.get(collection).cloned().unwrap_or_default()
        };

        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|sub| sub.sink.is_live());
        for sub in subscribers.iter().filter(|s| s.collection == collection) {
            let matching: Vec<Document> = docs
                .iter()
                .filter(|doc| sub.predicate.matches(doc))
                .cloned()
                .collect();
            let _ = sub.sink.send(SnapshotEvent::Data(matching));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_one(&self, collection: &str, id: Uuid) -> Result<Option<Document>, AppError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn write_one(
        &self,
        collection: &str,
        id: Uuid,
        fields: FieldMap,
        merge: bool,
    ) -> Result<(), AppError> {
        {
            let mut collections = self.collections.lock().await;
            let docs = collections.entry(collection.to_string()).or_default();
            match docs.iter_mut().find(|doc| doc.id == id) {
                Some(doc) if merge => {
                    for (name, value) in fields {
                        doc.fields.insert(name, value);
                    }
                }
                Some(doc) => doc.fields = fields,
                None => docs.push(Document::new(id, fields)),
            }
        }

        tracing::debug!("Wrote document {} in {}", id, collection);
        self.publish(collection).await;
        Ok(())
    }

    async fn create_one(&self, collection: &str, fields: FieldMap) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        {
            let mut collections = self.collections.lock().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .push(Document::new(id, fields));
        }

        tracing::debug!("Created document {} in {}", id, collection);
        self.publish(collection).await;
        Ok(id)
    }

    async fn delete_one(&self, collection: &str, id: Uuid) -> Result<(), AppError> {
        let removed = {
            let mut collections = self.collections.lock().await;
            match collections.get_mut(collection) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|doc| doc.id != id);
                    docs.len() != before
                }
                None => false,
            }
        };

        if !removed {
            return Err(AppError::NotFound("Document not found".into()));
        }

        tracing::debug!("Deleted document {} from {}", id, collection);
        self.publish(collection).await;
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| predicate.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe(
        &self,
        collection: &str,
        predicate: Predicate,
    ) -> Result<Subscription, AppError> {
        let (sink, subscription) = Subscription::channel();

        // Register before reading so no concurrent mutation is missed; a
        // duplicate snapshot is harmless since every delivery is the full
        // matching set
        let mut subscribers = self.subscribers.lock().await;
        let initial: Vec<Document> = {
            let collections = self.collections.lock().await;
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| predicate.matches(doc))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };
        let _ = sink.send(SnapshotEvent::Data(initial));
        subscribers.push(Subscriber {
            collection: collection.to_string(),
            predicate,
            sink,
        });

        Ok(subscription)
    }
}
