use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tutor_hub::auth::{AuthConfig, AuthProvider, MemoryAuth};
use tutor_hub::db;
use tutor_hub::errors::AppError;
use tutor_hub::live::{self, ScopedLiveQuery};
use tutor_hub::models::document::{Document, FieldMap, fields_of};
use tutor_hub::models::event::{Event, NewEvent};
use tutor_hub::state::{AppState, AuthClient, StoreClient};
use tutor_hub::store::{
    Collection, DocumentStore, MemoryStore, Predicate, SnapshotEvent, Subscription,
};
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn test_state() -> AppState {
    AppState::in_memory(AuthConfig {
        jwt_secret: "test-secret".into(),
        ..AuthConfig::default()
    })
}

fn event_fields(user_id: Uuid, title: &str) -> FieldMap {
    fields_of(json!({
        "title": title,
        "date": "2024-03-01T10:00:00Z",
        "type": "exam",
        "description": "",
        "userId": user_id,
        "createdAt": "2024-02-20T09:00:00Z",
    }))
    .unwrap()
}

fn expect_data(query_result: Option<SnapshotEvent>) -> Vec<Document> {
    match query_result {
        Some(SnapshotEvent::Data(docs)) => docs,
        other => panic!("expected a data snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subscription_delivers_initial_and_updated_snapshots() {
    init_tracing();
    let store: StoreClient = Arc::new(MemoryStore::new());
    let user = Uuid::new_v4();

    let mut subscription = store
        .subscribe(
            Collection::EVENTS,
            Predicate::field("userId", user.to_string()),
        )
        .await
        .unwrap();

    let initial = expect_data(subscription.next().await);
    assert!(initial.is_empty());

    store
        .create_one(Collection::EVENTS, event_fields(user, "Midterm"))
        .await
        .unwrap();
    let snapshot = expect_data(subscription.next().await);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].decode::<Event>().unwrap().title, "Midterm");

    // Documents outside the predicate re-deliver the same matching set
    store
        .create_one(Collection::EVENTS, event_fields(Uuid::new_v4(), "Other"))
        .await
        .unwrap();
    let snapshot = expect_data(subscription.next().await);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].decode::<Event>().unwrap().title, "Midterm");
}

#[tokio::test]
async fn test_no_delivery_after_teardown() {
    let store: StoreClient = Arc::new(MemoryStore::new());
    let user = Uuid::new_v4();

    let mut subscription = store
        .subscribe(
            Collection::EVENTS,
            Predicate::field("userId", user.to_string()),
        )
        .await
        .unwrap();
    expect_data(subscription.next().await);

    // Queue a snapshot, then tear down before reading: the in-flight
    // delivery must not be observed
    store
        .create_one(Collection::EVENTS, event_fields(user, "Midterm"))
        .await
        .unwrap();
    subscription.stop();

    assert!(subscription.next().await.is_none());
    assert!(!subscription.is_live());
}

#[tokio::test]
async fn test_mutations_after_teardown_are_not_delivered() {
    let store: StoreClient = Arc::new(MemoryStore::new());
    let user = Uuid::new_v4();

    let mut subscription = store
        .subscribe(
            Collection::EVENTS,
            Predicate::field("userId", user.to_string()),
        )
        .await
        .unwrap();
    expect_data(subscription.next().await);
    subscription.stop();

    // The store sheds the dead subscriber on its next publish
    store
        .create_one(Collection::EVENTS, event_fields(user, "Midterm"))
        .await
        .unwrap();
    assert!(subscription.next().await.is_none());
}

#[tokio::test]
async fn test_scoped_query_follows_identity() {
    init_tracing();
    let state = test_state();
    let mut query = live::user_events(&state);

    // Signed out: empty set
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    let alice = db::account::register_account(
        "alice@example.com",
        "password1",
        "Alice Anders",
        "Alice",
        "Anders",
        &state.auth,
        &state.store,
    )
    .await
    .unwrap();

    // Fresh subscription for the signed-in user
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    db::event::post::add_event(
        Some(&alice),
        NewEvent {
            title: "Midterm".into(),
            date: "2024-03-01T10:00:00Z".into(),
            ..NewEvent::default()
        },
        &state.store,
    )
    .await
    .unwrap();
    let docs = expect_data(query.next().await);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].decode::<Event>().unwrap().user_id, alice.id);

    // Sign-out clears the set
    state.auth.sign_out().await.unwrap();
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    // A different signed-in user does not see Alice's events
    db::account::register_account(
        "bob@example.com",
        "password1",
        "Bob Baker",
        "Bob",
        "Baker",
        &state.auth,
        &state.store,
    )
    .await
    .unwrap();
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    query.stop();
    assert!(query.next().await.is_none());
}

#[tokio::test]
async fn test_scoped_profile_query_sees_tutor_registration() {
    let state = test_state();
    let alice = db::account::register_account(
        "alice@example.com",
        "password1",
        "Alice Anders",
        "Alice",
        "Anders",
        &state.auth,
        &state.store,
    )
    .await
    .unwrap();

    let mut query = live::own_profile(&state);
    let docs = expect_data(query.next().await);
    assert_eq!(docs.len(), 1);
    assert!(
        !docs[0]
            .decode::<tutor_hub::models::UserProfile>()
            .unwrap()
            .tutor_verified
    );

    db::user::patch::register_tutor(&alice, "alice@university.edu", &state.store)
        .await
        .unwrap();
    let docs = expect_data(query.next().await);
    assert!(
        docs[0]
            .decode::<tutor_hub::models::UserProfile>()
            .unwrap()
            .tutor_verified
    );
}

#[tokio::test]
async fn test_scoped_ratings_query_sees_new_ratings() {
    let state = test_state();
    let alice = db::account::register_account(
        "alice@example.com",
        "password1",
        "Alice Anders",
        "Alice",
        "Anders",
        &state.auth,
        &state.store,
    )
    .await
    .unwrap();

    let mut query = live::own_tutor_ratings(&state);
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    let rater = tutor_hub::auth::Identity {
        id: Uuid::new_v4(),
        email: "bob@example.com".into(),
        display_name: None,
    };
    db::rating::post::submit_rating(Some(&rater), alice.id, 5, None, None, &state.store)
        .await
        .unwrap();

    let docs = expect_data(query.next().await);
    assert_eq!(docs.len(), 1);
    let rating = docs[0].decode::<tutor_hub::models::rating::Rating>().unwrap();
    assert_eq!(rating.tutor_id, alice.id);
    assert_eq!(rating.rating, 5);
}

#[tokio::test]
async fn test_scoped_room_query_delivers_both_sides() {
    let state = test_state();
    let bob_id = Uuid::new_v4();
    let alice = db::account::register_account(
        "alice@example.com",
        "password1",
        "Alice Anders",
        "Alice",
        "Anders",
        &state.auth,
        &state.store,
    )
    .await
    .unwrap();

    let mut query = live::room_messages(&state, bob_id);
    let docs = expect_data(query.next().await);
    assert!(docs.is_empty());

    db::chat::post::send_message(Some(&alice), bob_id, "Hi Bob", &state.store)
        .await
        .unwrap();
    let docs = expect_data(query.next().await);
    assert_eq!(docs.len(), 1);
}

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn read_one(&self, _collection: &str, _id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(None)
    }

    async fn write_one(
        &self,
        _collection: &str,
        _id: Uuid,
        _fields: FieldMap,
        _merge: bool,
    ) -> Result<(), AppError> {
        Err(AppError::StoreError("store unavailable".into()))
    }

    async fn create_one(&self, _collection: &str, _fields: FieldMap) -> Result<Uuid, AppError> {
        Err(AppError::StoreError("store unavailable".into()))
    }

    async fn delete_one(&self, _collection: &str, _id: Uuid) -> Result<(), AppError> {
        Err(AppError::StoreError("store unavailable".into()))
    }

    async fn query(
        &self,
        _collection: &str,
        _predicate: &Predicate,
    ) -> Result<Vec<Document>, AppError> {
        Ok(Vec::new())
    }

    async fn subscribe(
        &self,
        _collection: &str,
        _predicate: Predicate,
    ) -> Result<Subscription, AppError> {
        let (sink, subscription) = Subscription::channel();
        let _ = sink.send(SnapshotEvent::Error(AppError::SubscriptionError(
            "Failed to load events".into(),
        )));
        Ok(subscription)
    }
}

#[tokio::test]
async fn test_subscription_errors_are_surfaced() {
    let auth_impl = MemoryAuth::new(AuthConfig {
        jwt_secret: "test-secret".into(),
        ..AuthConfig::default()
    });
    auth_impl
        .sign_up("erin@example.com", "password1")
        .await
        .unwrap();
    let auth: AuthClient = Arc::new(auth_impl);
    let store: StoreClient = Arc::new(FailingStore);

    let mut query = ScopedLiveQuery::spawn(store, &auth, Collection::EVENTS, |identity| {
        Predicate::field("userId", identity.id.to_string())
    });

    match query.next().await {
        Some(SnapshotEvent::Error(e)) => {
            assert_eq!(e.to_status().message, "Failed to load events");
        }
        other => panic!("expected an error snapshot, got {other:?}"),
    }
}
