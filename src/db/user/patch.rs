use chrono::Utc;
use serde_json::json;

use crate::{
    auth::Identity,
    errors::AppError,
    models::{UserProfile, document::fields_of, user::Subject},
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

/// Register the signed-in user as a tutor under their educational email.
pub async fn register_tutor(
    identity: &Identity,
    educational_email: &str,
    store: &StoreClient,
) -> Result<(), AppError> {
    let email = educational_email.trim();
    if !email.ends_with(".edu") {
        return Err(AppError::Validation(
            "Please enter a valid .edu email address".into(),
        ));
    }

    // One tutor per educational email
    let existing = store
        .query(Collection::USERS, &Predicate::field("educationalEmail", email))
        .await?;
    if existing.iter().any(|doc| doc.id != identity.id) {
        return Err(AppError::AlreadyExists(
            "This educational email is already registered".into(),
        ));
    }

    let fields = fields_of(json!({
        "educationalEmail": email,
        "isTutor": true,
        "tutorVerified": true,
        "updatedAt": Utc::now(),
    }))?;

    store
        .write_one(Collection::USERS, identity.id, fields, true)
        .await?;

    tracing::info!("Registered {} as a tutor", identity.id);
    Ok(())
}

/// Append a tutoring subject to the signed-in user's profile.
pub async fn add_subject(
    identity: &Identity,
    subject: Subject,
    store: &StoreClient,
) -> Result<(), AppError> {
    if subject.name.trim().is_empty() {
        return Err(AppError::Validation("Subject is required".into()));
    }

    let doc = store
        .read_one(Collection::USERS, identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User profile not found".into()))?;
    let mut profile: UserProfile = doc.decode()?;
    profile.subjects.push(subject);

    let fields = fields_of(json!({ "subjects": profile.subjects }))?;
    store
        .write_one(Collection::USERS, identity.id, fields, true)
        .await
}
