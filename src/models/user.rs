use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,

    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub is_tutor: bool,
    #[serde(default)]
    pub tutor_verified: bool,
    #[serde(default)]
    pub educational_email: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,

    // Denormalized directory average; 0 until rated
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
