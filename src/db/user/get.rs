use uuid::Uuid;

use crate::{
    errors::AppError,
    models::UserProfile,
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

pub async fn get_user_profile(user_id: Uuid, store: &StoreClient) -> Result<UserProfile, AppError> {
    let doc = store
        .read_one(Collection::USERS, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    doc.decode()
}

/// Verified tutors for the directory, best-rated first.
pub async fn get_verified_tutors(store: &StoreClient) -> Result<Vec<UserProfile>, AppError> {
    let docs = store
        .query(Collection::USERS, &Predicate::field("tutorVerified", true))
        .await?;

    let mut tutors = Vec::new();
    for doc in docs {
        if let Ok(tutor) = doc.decode::<UserProfile>() {
            tutors.push(tutor);
        }
    }

    tutors.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(tutors)
}
