use uuid::Uuid;

use crate::{
    errors::AppError,
    models::rating::Rating,
    state::StoreClient,
    store::{Collection, DocumentStore, Predicate},
};

pub async fn get_tutor_ratings(tutor_id: Uuid, store: &StoreClient) -> Result<Vec<Rating>, AppError> {
    let docs = store
        .query(
            Collection::RATINGS,
            &Predicate::field("tutorId", tutor_id.to_string()),
        )
        .await?;

    docs.iter().map(|doc| doc.decode()).collect()
}
