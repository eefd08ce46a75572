//! Board Projection — the client's renderable view of which candidates sit
//! in which stage.
//!
//! Fully derived from the server: it carries no information the server does
//! not also have, so it is rebuilt wholesale on refresh and never persisted.
//! There is no per-field cache invalidation, only whole-projection rebuild.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::models::{CandidateSummary, Stage};

/// One rendered column: a stage plus its ordered candidate cards.
#[derive(Debug, Clone, PartialEq)]
pub struct StageColumn {
    pub stage: Stage,
    pub candidates: Vec<CandidateSummary>,
}

/// Mapping from stage to ordered candidate list.
///
/// Invariant: a candidate id appears in at most one column at any instant.
/// `assemble` enforces it on build; the move coordinator preserves it by
/// always removing a card before re-inserting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    columns: Vec<StageColumn>,
}

impl Projection {
    /// Builds a projection from the stage directory and the per-stage
    /// rosters. Pure; no I/O.
    ///
    /// Columns are sorted ascending by stage order, ties broken by id. A
    /// roster keyed by a stage the directory does not know is dropped with a
    /// warning, as is any candidate already placed in an earlier column —
    /// bad records degrade the board, they never crash it.
    pub fn assemble(
        mut stages: Vec<Stage>,
        mut rosters: HashMap<String, Vec<CandidateSummary>>,
    ) -> Self {
        stages.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(stages.len());
        for stage in stages {
            let roster = rosters.remove(&stage.id).unwrap_or_default();
            let mut candidates = Vec::with_capacity(roster.len());
            for candidate in roster {
                if !seen.insert(candidate.id.clone()) {
                    warn!(
                        candidate_id = %candidate.id,
                        stage_id = %stage.id,
                        "dropping candidate already placed in another column"
                    );
                    continue;
                }
                candidates.push(candidate);
            }
            columns.push(StageColumn { stage, candidates });
        }

        for (stage_id, roster) in rosters {
            if !roster.is_empty() {
                warn!(
                    %stage_id,
                    count = roster.len(),
                    "dropping roster for a stage missing from the directory"
                );
            }
        }

        Projection { columns }
    }

    pub fn columns(&self) -> &[StageColumn] {
        &self.columns
    }

    pub fn column(&self, stage_id: &str) -> Option<&StageColumn> {
        self.columns.iter().find(|c| c.stage.id == stage_id)
    }

    /// Finds the candidate's containing stage id and its index within that
    /// column.
    pub fn locate(&self, candidate_id: &str) -> Option<(&str, usize)> {
        for column in &self.columns {
            if let Some(index) = column.candidates.iter().position(|c| c.id == candidate_id) {
                return Some((column.stage.id.as_str(), index));
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn candidate_count(&self) -> usize {
        self.columns.iter().map(|c| c.candidates.len()).sum()
    }

    /// Removes a candidate wherever it sits. Coordinator use only — the
    /// projection has a single writer.
    pub(crate) fn remove(&mut self, candidate_id: &str) -> Option<CandidateSummary> {
        for column in &mut self.columns {
            if let Some(index) = column.candidates.iter().position(|c| c.id == candidate_id) {
                return Some(column.candidates.remove(index));
            }
        }
        None
    }

    /// Inserts a candidate into a stage column at `index`, clamped to the
    /// column length. Gives the candidate back if the stage is unknown so
    /// the caller can restore it.
    pub(crate) fn insert(
        &mut self,
        stage_id: &str,
        index: usize,
        candidate: CandidateSummary,
    ) -> Result<(), CandidateSummary> {
        match self.columns.iter_mut().find(|c| c.stage.id == stage_id) {
            Some(column) => {
                let index = index.min(column.candidates.len());
                column.candidates.insert(index, candidate);
                Ok(())
            }
            None => Err(candidate),
        }
    }
}
