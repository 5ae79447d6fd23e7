use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::Identity,
    errors::AppError,
    models::document::fields_of,
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

/// Submit a rating for a tutor. At most one rating per (tutor, user)
/// pair; the existence check runs before any write.
pub async fn submit_rating(
    identity: Option<&Identity>,
    tutor_id: Uuid,
    rating: i16,
    comment: Option<String>,
    subject: Option<String>,
    store: &StoreClient,
) -> Result<Uuid, AppError> {
    let Some(user) = identity else {
        return Err(AppError::Unauthorized("Please sign in to rate tutors".into()));
    };

    // 0 is the "not selected" sentinel from the rating widget
    if rating == 0 {
        return Err(AppError::Validation("Please select a rating".into()));
    }
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }

    let existing = store
        .query(
            Collection::RATINGS,
            &Predicate::field("tutorId", tutor_id.to_string())
                .and("userId", user.id.to_string()),
        )
        .await?;
    if !existing.is_empty() {
        return Err(AppError::AlreadyExists(
            "You have already rated this tutor".into(),
        ));
    }

    let fields = fields_of(json!({
        "tutorId": tutor_id,
        "userId": user.id,
        "rating": rating,
        "comment": comment,
        "subject": subject,
        "createdAt": Utc::now(),
    }))?;

    let id = store.create_one(Collection::RATINGS, fields).await?;
    tracing::debug!("Stored rating {} for tutor {}", id, tutor_id);
    Ok(id)
}
