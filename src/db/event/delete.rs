use uuid::Uuid;

use crate::{
    errors::AppError,
    state::StoreClient,
    store::{Collection, DocumentStore},
};

pub async fn delete_event(event_id: Uuid, store: &StoreClient) -> Result<(), AppError> {
    store.delete_one(Collection::EVENTS, event_id).await?;
    tracing::debug!("Deleted event {}", event_id);
    Ok(())
}
