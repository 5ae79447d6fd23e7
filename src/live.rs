use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use crate::{
    auth::{AuthProvider, Identity},
    models::chat::room_key,
    state::{AppState, AuthClient, StoreClient},
    store::{Collection, DocumentStore, Predicate, SnapshotEvent},
};

/// Identity-scoped live query. Re-subscribes whenever the signed-in user
/// changes, delivers an empty snapshot while signed out, and never yields
/// after `stop`.
pub struct ScopedLiveQuery {
    live: Arc<AtomicBool>,
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
    task: JoinHandle<()>,
}

impl ScopedLiveQuery {
    pub fn spawn<F>(
        store: StoreClient,
        auth: &AuthClient,
        collection: impl Into<String>,
        scope: F,
    ) -> Self
    where
        F: Fn(&Identity) -> Predicate + Send + 'static,
    {
        let collection = collection.into();
        let mut identities = auth.identity_changes();
        let (tx, rx) = mpsc::unbounded_channel();
        let live = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(async move {
            let mut current: Option<Identity> = identities.borrow_and_update().clone();
            loop {
                let Some(identity) = current.clone() else {
                    // Signed out: the matching set is empty by definition
                    if tx.send(SnapshotEvent::Data(Vec::new())).is_err() {
                        return;
                    }
                    if identities.changed().await.is_err() {
                        return;
                    }
                    current = identities.borrow_and_update().clone();
                    continue;
                };

                let mut subscription =
                    match store.subscribe(&collection, scope(&identity)).await {
                        Ok(subscription) => subscription,
                        Err(e) => {
                            let _ = tx.send(SnapshotEvent::Error(e));
                            if identities.changed().await.is_err() {
                                return;
                            }
                            current = identities.borrow_and_update().clone();
                            continue;
                        }
                    };

                loop {
                    tokio::select! {
                        changed = identities.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            let next = identities.borrow_and_update().clone();
                            // Same user (e.g. a display-name update): keep
                            // the subscription
                            if next.as_ref().map(|i| i.id) == Some(identity.id) {
                                continue;
                            }
                            subscription.stop();
                            current = next;
                            break;
                        }
                        event = subscription.next() => {
                            match event {
                                Some(event) => {
                                    if tx.send(event).is_err() {
                                        return;
                                    }
                                }
                                // Store closed the subscription
                                None => return,
                            }
                        }
                    }
                }
            }
        });

        Self { live, rx, task }
    }

    /// Next snapshot, `None` after teardown even for in-flight events.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        if !self.live.load(Ordering::Acquire) {
            return None;
        }
        let event = self.rx.recv().await?;
        if self.live.load(Ordering::Acquire) {
            Some(event)
        } else {
            None
        }
    }

    pub fn stop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.task.abort();
        self.rx.close();
    }
}

impl Drop for ScopedLiveQuery {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.task.abort();
    }
}

/// Calendar events owned by the signed-in user.
pub fn user_events(state: &AppState) -> ScopedLiveQuery {
    ScopedLiveQuery::spawn(
        state.store.clone(),
        &state.auth,
        Collection::EVENTS,
        |identity| Predicate::field("userId", identity.id.to_string()),
    )
}

/// Ratings received by the signed-in user in their tutor role.
pub fn own_tutor_ratings(state: &AppState) -> ScopedLiveQuery {
    ScopedLiveQuery::spawn(
        state.store.clone(),
        &state.auth,
        Collection::RATINGS,
        |identity| Predicate::field("tutorId", identity.id.to_string()),
    )
}

/// The signed-in user's profile document.
pub fn own_profile(state: &AppState) -> ScopedLiveQuery {
    ScopedLiveQuery::spawn(
        state.store.clone(),
        &state.auth,
        Collection::USERS,
        |identity| Predicate::field("id", identity.id.to_string()),
    )
}

/// Messages in the two-party room shared with `peer`.
pub fn room_messages(state: &AppState, peer: Uuid) -> ScopedLiveQuery {
    ScopedLiveQuery::spawn(
        state.store.clone(),
        &state.auth,
        Collection::MESSAGES,
        move |identity| Predicate::field("room", room_key(identity.id, peer)),
    )
}
