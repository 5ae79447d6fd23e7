use crate::{
    errors::AppError,
    models::chat::ChatMessage,
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

/// Messages in a room, ordered by creation time for display.
pub async fn get_room_messages(
    room: &str,
    store: &StoreClient,
) -> Result<Vec<ChatMessage>, AppError> {
    let docs = store
        .query(Collection::MESSAGES, &Predicate::field("room", room))
        .await?;

    let mut messages: Vec<ChatMessage> = docs
        .iter()
        .map(|doc| doc.decode())
        .collect::<Result<_, _>>()?;
    messages.sort_by_key(|message| message.created_at);
    Ok(messages)
}
