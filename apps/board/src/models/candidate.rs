use serde::{Deserialize, Serialize};

/// The board's summary view of a candidate — only what a card renders.
/// The full record lives on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub linked_vacancy_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagSummary>,
}

/// A tag chip shown on a candidate card. Cosmetic; owned by the tag service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}
