//! Detail Overlay — the notes panel opened from a candidate card.
//!
//! Peripheral to the kanban core: it reads and writes through the
//! independent notes service and never touches the board projection. A
//! successful write reports `needs_board_refresh` so the shell re-fetches
//! the whole board instead of patching it in place, keeping the move
//! coordinator the projection's single writer.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiError, NotesApi};
use crate::models::Note;

/// Outcome of a note write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSaved {
    /// The board may render note indicators on cards, so the shell must
    /// rebuild the projection after a write.
    pub needs_board_refresh: bool,
}

/// Notes state for one open candidate card, with a client-side fallback
/// cache keyed by the candidate's linked vacancy. The cache only softens
/// read failures; it is never treated as the source of truth.
pub struct DetailOverlay {
    api: Arc<dyn NotesApi>,
    fallback: HashMap<String, Vec<Note>>,
}

impl DetailOverlay {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        DetailOverlay {
            api,
            fallback: HashMap::new(),
        }
    }

    /// Loads the notes for a candidate. A successful read refreshes the
    /// fallback cache for the linked vacancy; a failed read serves the
    /// cached copy when one exists so the overlay still opens.
    pub async fn open(
        &mut self,
        candidate_id: &str,
        linked_vacancy_id: Option<&str>,
    ) -> Result<Vec<Note>, ApiError> {
        match self.api.list_notes(candidate_id).await {
            Ok(notes) => {
                if let Some(vacancy_id) = linked_vacancy_id {
                    self.fallback.insert(vacancy_id.to_string(), notes.clone());
                }
                Ok(notes)
            }
            Err(err) => match linked_vacancy_id.and_then(|v| self.fallback.get(v)) {
                Some(cached) => {
                    warn!(candidate_id, "notes fetch failed, serving cached copy: {err}");
                    Ok(cached.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Writes a note through the notes service.
    pub async fn save_note(
        &mut self,
        candidate_id: &str,
        linked_vacancy_id: Option<&str>,
        text: &str,
    ) -> Result<NoteSaved, ApiError> {
        let note = Note::new(candidate_id, text);
        self.api.add_note(&note).await?;
        if let Some(vacancy_id) = linked_vacancy_id {
            self.fallback
                .entry(vacancy_id.to_string())
                .or_default()
                .push(note);
        }
        Ok(NoteSaved {
            needs_board_refresh: true,
        })
    }
}
