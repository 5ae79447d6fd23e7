use uuid::Uuid;

use crate::{
    errors::AppError,
    models::event::Event,
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

/// Events owned by `user_id`, in creation order.
pub async fn get_user_events(user_id: Uuid, store: &StoreClient) -> Result<Vec<Event>, AppError> {
    let docs = store
        .query(
            Collection::EVENTS,
            &Predicate::field("userId", user_id.to_string()),
        )
        .await?;

    docs.iter().map(|doc| doc.decode()).collect()
}
