use serde::{Deserialize, Serialize};

/// A named column of the hiring pipeline (e.g. "Applied", "Interview").
///
/// Stages are created and edited by organization admins through a separate
/// management surface; the board treats the directory as read-only. `order`
/// defines left-to-right column position and is not required to be unique —
/// ties are broken by `id` so column order stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// A default stage cannot be deleted. Enforced server-side; the client
    /// only disables the delete action in the management surface.
    #[serde(default)]
    pub is_default: bool,
}

fn default_active() -> bool {
    true
}
