use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub room: String,
    pub text: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Deterministic two-party room key, independent of argument order.
pub fn room_key(a: Uuid, b: Uuid) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("chat_{lo}_{hi}")
}
