//! Recording test double for the workflow backend, shared by the loader and
//! coordinator tests. State sits behind sync mutexes; no lock is ever held
//! across an await.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, WorkflowApi};
use crate::models::{CandidateSummary, Stage};

pub(crate) fn stage(id: &str, name: &str, order: i32) -> Stage {
    Stage {
        id: id.to_string(),
        name: name.to_string(),
        order,
        color: None,
        active: true,
        is_default: false,
    }
}

pub(crate) fn candidate(id: &str) -> CandidateSummary {
    CandidateSummary {
        id: id.to_string(),
        display_name: format!("resume_{id}.pdf"),
        notes: None,
        linked_vacancy_id: None,
        tags: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListStages,
    ListCandidates {
        stage_id: String,
        search: Option<String>,
    },
    MoveCandidate {
        candidate_id: String,
        dest_stage_id: String,
    },
}

#[derive(Default)]
struct MockState {
    stages: Vec<Stage>,
    rosters: HashMap<String, Vec<CandidateSummary>>,
    fail_stage_load: bool,
    failing_rosters: HashSet<String>,
    fail_moves: bool,
    calls: Vec<Call>,
}

/// Programmable backend: rosters mutate on `move_candidate` (appending to the
/// destination, the way a server applying its own ordering would), and any
/// call can be made to fail.
pub(crate) struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new(
        stages: Vec<Stage>,
        rosters: Vec<(&str, Vec<CandidateSummary>)>,
    ) -> Arc<Self> {
        Arc::new(MockApi {
            state: Mutex::new(MockState {
                stages,
                rosters: rosters
                    .into_iter()
                    .map(|(id, roster)| (id.to_string(), roster))
                    .collect(),
                ..MockState::default()
            }),
        })
    }

    pub fn fail_stage_load(&self) {
        self.state.lock().unwrap().fail_stage_load = true;
    }

    pub fn fail_roster(&self, stage_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_rosters
            .insert(stage_id.to_string());
    }

    pub fn fail_moves(&self, fail: bool) {
        self.state.lock().unwrap().fail_moves = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn move_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::MoveCandidate { .. }))
            .count()
    }

    fn rejection() -> ApiError {
        ApiError::Api {
            status: 503,
            message: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl WorkflowApi for MockApi {
    async fn list_stages(&self, _organization_id: &str) -> Result<Vec<Stage>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListStages);
        if state.fail_stage_load {
            return Err(Self::rejection());
        }
        Ok(state.stages.clone())
    }

    async fn list_candidates(
        &self,
        stage_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<CandidateSummary>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListCandidates {
            stage_id: stage_id.to_string(),
            search: search.map(str::to_string),
        });
        if state.failing_rosters.contains(stage_id) {
            return Err(Self::rejection());
        }
        let roster = state.rosters.get(stage_id).cloned().unwrap_or_default();
        Ok(match search {
            Some(term) => roster
                .into_iter()
                .filter(|c| c.display_name.contains(term))
                .collect(),
            None => roster,
        })
    }

    async fn move_candidate(
        &self,
        candidate_id: &str,
        dest_stage_id: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::MoveCandidate {
            candidate_id: candidate_id.to_string(),
            dest_stage_id: dest_stage_id.to_string(),
        });
        if state.fail_moves {
            return Err(ApiError::Api {
                status: 422,
                message: "stage transition rejected".to_string(),
            });
        }

        let mut moved = None;
        for roster in state.rosters.values_mut() {
            if let Some(index) = roster.iter().position(|c| c.id == candidate_id) {
                moved = Some(roster.remove(index));
                break;
            }
        }
        let moved = moved.ok_or_else(|| ApiError::Api {
            status: 404,
            message: format!("candidate {candidate_id} not found"),
        })?;
        state
            .rosters
            .entry(dest_stage_id.to_string())
            .or_default()
            .push(moved);
        Ok(())
    }
}
