use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::Identity,
    errors::AppError,
    models::{chat::room_key, document::fields_of},
    state::StoreClient,
    store::{Collection, DocumentStore},
};

/// Store a chat message in the two-party room shared with `peer_id`.
pub async fn send_message(
    identity: Option<&Identity>,
    peer_id: Uuid,
    text: &str,
    store: &StoreClient,
) -> Result<Uuid, AppError> {
    let Some(user) = identity else {
        return Err(AppError::Unauthorized(
            "Please sign in to send messages".into(),
        ));
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".into()));
    }

    let room = room_key(user.id, peer_id);
    let fields = fields_of(json!({
        "room": room,
        "text": html_escape::encode_text(text),
        "userId": user.id,
        "userName": user.display_name.clone().unwrap_or_default(),
        "createdAt": Utc::now(),
    }))?;

    let id = store.create_one(Collection::MESSAGES, fields).await?;
    tracing::debug!("Stored chat message {} in room {}", id, room);
    Ok(id)
}
