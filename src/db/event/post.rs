use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::Identity,
    errors::AppError,
    models::{document::fields_of, event::NewEvent},
    state::StoreClient,
    store::{Collection, DocumentStore},
};

/// Add a calendar event owned by the signed-in user.
pub async fn add_event(
    identity: Option<&Identity>,
    event: NewEvent,
    store: &StoreClient,
) -> Result<Uuid, AppError> {
    if event.title.trim().is_empty() {
        return Err(AppError::Validation("Please enter an event title".into()));
    }
    let Some(user) = identity else {
        return Err(AppError::Unauthorized(
            "You must be logged in to add events".into(),
        ));
    };

    let fields = fields_of(json!({
        "title": event.title.trim(),
        "date": event.date,
        "type": event.event_type.trim(),
        "description": event.description.trim(),
        "userId": user.id,
        "createdAt": Utc::now(),
    }))?;

    store.create_one(Collection::EVENTS, fields).await
}
