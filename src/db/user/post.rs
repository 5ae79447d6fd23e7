use chrono::Utc;
use serde_json::json;

use crate::{
    auth::Identity,
    errors::AppError,
    models::document::fields_of,
    state::StoreClient,
    store::{Collection, DocumentStore},
};

/// Create the profile document for a freshly signed-up user.
pub async fn create_user_profile(
    identity: &Identity,
    display_name: &str,
    first_name: &str,
    last_name: &str,
    store: &StoreClient,
) -> Result<(), AppError> {
    let fields = fields_of(json!({
        "displayName": display_name,
        "firstName": first_name,
        "lastName": last_name,
        "email": identity.email,
        "isTutor": false,
        "tutorVerified": false,
        "educationalEmail": "",
        "subjects": [],
        "createdAt": Utc::now(),
    }))?;

    store
        .write_one(Collection::USERS, identity.id, fields, false)
        .await?;

    tracing::debug!("Created profile for user {}", identity.id);
    Ok(())
}

/// Create the profile document if it does not exist yet.
pub async fn ensure_user_profile(identity: &Identity, store: &StoreClient) -> Result<(), AppError> {
    match store.read_one(Collection::USERS, identity.id).await? {
        Some(_) => Ok(()),
        None => {
            create_user_profile(
                identity,
                identity.display_name.as_deref().unwrap_or(""),
                "",
                "",
                store,
            )
            .await
        }
    }
}
