use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recruiter free-text note attached to a candidate. Ids are generated
/// client-side so a note written while offline can still land in the
/// fallback cache under a stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub candidate_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(candidate_id: impl Into<String>, text: impl Into<String>) -> Self {
        Note {
            id: Uuid::new_v4(),
            candidate_id: candidate_id.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
