//! Move Coordinator — owns the board projection and routes every mutation
//! (optimistic apply, rollback, refresh) through one writer.
//!
//! Per-candidate state machine: `Settled(stage)` → `Pending(source, dest)` →
//! `Settled(dest)` on commit success or `Settled(source)` on failure. A
//! commit resolution always terminates `Pending`, and a pending card is not
//! draggable, so a candidate can never be pending in two places.
//!
//! The API is split-phase: `begin_move` and `complete_move` are synchronous,
//! so all projection mutation happens between network awaits and no other
//! drag can observe a half-applied board. `perform_move` drives the whole
//! sequence for the common case; tests and shells that allow two candidates
//! to be in flight at once use the phases directly.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, WorkflowApi};
use crate::errors::BoardError;
use crate::loader::load_board;
use crate::projection::Projection;

/// Where a candidate stands in the move state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveState {
    /// The projection reflects the server's last-known stage.
    Settled { stage_id: String },
    /// An optimistic move has been applied and its commit is in flight.
    Pending {
        source_stage_id: String,
        dest_stage_id: String,
    },
}

/// A drag-end event as reported by the rendering shell.
#[derive(Debug, Clone)]
pub struct DragEnd {
    pub candidate_id: String,
    pub source_stage_id: String,
    /// `None` when the card was dropped outside any column.
    pub dest_stage_id: Option<String>,
    pub dest_index: usize,
}

/// Transient record of an in-flight optimistic move. Lives exactly as long
/// as the candidate is `Pending`; the shell reads it to render the card in
/// its predicted position while drag stays disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub source_stage_id: String,
    pub dest_stage_id: String,
    pub dest_index: usize,
}

/// Handle for an in-flight move, returned by `begin_move` and redeemed by
/// `complete_move`. Carries the pre-move snapshot used for rollback and the
/// board generation it belongs to.
#[derive(Debug)]
pub struct MoveTicket {
    candidate_id: String,
    dest_stage_id: String,
    snapshot: Projection,
    epoch: u64,
}

impl MoveTicket {
    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn dest_stage_id(&self) -> &str {
        &self.dest_stage_id
    }
}

/// What `begin_move` decided about a drag-end event.
#[derive(Debug)]
pub enum BeginMove {
    /// Dropped in place, outside the board, or on a card whose previous move
    /// is still pending: nothing changed and no network call may be made.
    NoOp,
    /// Optimistic state applied. Commit the move, then redeem the ticket.
    InFlight(MoveTicket),
}

/// What `complete_move` decided about a commit resolution.
#[derive(Debug)]
pub enum MoveResolution {
    /// Commit succeeded. The optimistic state is never trusted as final —
    /// the caller must refresh so the projection converges to the server,
    /// which may have applied side effects beyond the one field we changed.
    NeedsRefresh,
    /// Commit failed and the pre-move snapshot was restored wholesale.
    Reverted(ApiError),
    /// Commit failed while another candidate's move was still in flight. A
    /// snapshot restore would clobber that move's optimistic state, so the
    /// caller must reconcile against a fresh load instead.
    NeedsRefreshAfterFailure(ApiError),
    /// The board was rebuilt while the commit was in flight; the resolution
    /// belongs to a dead generation and was discarded.
    Stale,
}

/// What a fully driven move amounted to, for the rendering shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The drag required no move (and made no network call).
    NoOp,
    /// The move was committed and the board refreshed from the server.
    Committed,
}

/// The kanban board: projection, per-candidate move state, and the single
/// write path for all of it.
pub struct Board {
    api: Arc<dyn WorkflowApi>,
    organization_id: String,
    projection: Projection,
    pending: HashMap<String, PendingMove>,
    epoch: u64,
}

impl Board {
    pub fn new(api: Arc<dyn WorkflowApi>, organization_id: impl Into<String>) -> Self {
        Board {
            api,
            organization_id: organization_id.into(),
            projection: Projection::default(),
            pending: HashMap::new(),
            epoch: 0,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// A pending card must be rendered drag-disabled; concurrent moves of
    /// the same candidate have no well-defined merge.
    pub fn is_draggable(&self, candidate_id: &str) -> bool {
        !self.pending.contains_key(candidate_id)
    }

    /// The in-flight move record for a pending candidate, if any.
    pub fn pending_move(&self, candidate_id: &str) -> Option<&PendingMove> {
        self.pending.get(candidate_id)
    }

    /// The candidate's position in the move state machine, or `None` for a
    /// candidate the board does not know.
    pub fn move_state(&self, candidate_id: &str) -> Option<MoveState> {
        if let Some(pending) = self.pending.get(candidate_id) {
            return Some(MoveState::Pending {
                source_stage_id: pending.source_stage_id.clone(),
                dest_stage_id: pending.dest_stage_id.clone(),
            });
        }
        self.projection
            .locate(candidate_id)
            .map(|(stage_id, _)| MoveState::Settled {
                stage_id: stage_id.to_string(),
            })
    }

    /// Opens a new load generation. The eventual projection must present
    /// this epoch to `apply_load` to be accepted; anything older is stale.
    pub fn begin_load(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Installs a freshly loaded projection, superseding all optimistic
    /// state. Rejects results from a generation the board has moved past —
    /// those are discarded, never applied to a board that no longer wants
    /// them.
    pub fn apply_load(&mut self, epoch: u64, projection: Projection) -> Result<(), BoardError> {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "discarding stale board load");
            return Err(BoardError::StaleResponse);
        }
        self.projection = projection;
        self.pending.clear();
        Ok(())
    }

    /// Whole-board rebuild from the server: the only form of cache
    /// invalidation this projection supports.
    pub async fn refresh(&mut self, search: Option<&str>) -> Result<(), BoardError> {
        let epoch = self.begin_load();
        let projection = load_board(&self.api, &self.organization_id, search).await?;
        self.apply_load(epoch, projection)
    }

    /// Handles a drag-end event up to the suspension point: guards,
    /// snapshot, optimistic apply. Synchronous by design.
    pub fn begin_move(&mut self, drag: &DragEnd) -> BeginMove {
        let Some(dest_stage_id) = drag.dest_stage_id.as_deref() else {
            return BeginMove::NoOp; // dropped outside the board
        };

        if self.pending.contains_key(&drag.candidate_id) {
            debug!(candidate_id = %drag.candidate_id, "ignoring drag of a pending candidate");
            return BeginMove::NoOp;
        }

        let Some((current_stage, current_index)) = self
            .projection
            .locate(&drag.candidate_id)
            .map(|(stage, index)| (stage.to_string(), index))
        else {
            warn!(candidate_id = %drag.candidate_id, "drag-end for a candidate not on the board");
            return BeginMove::NoOp;
        };
        if current_stage != drag.source_stage_id {
            // The projection is authoritative over the event's source field.
            warn!(
                candidate_id = %drag.candidate_id,
                reported = %drag.source_stage_id,
                actual = %current_stage,
                "drag-end source disagrees with the projection"
            );
        }

        // Dropping a card back on its own position is not a move.
        if current_stage == dest_stage_id && current_index == drag.dest_index {
            return BeginMove::NoOp;
        }

        if self.projection.column(dest_stage_id).is_none() {
            warn!(candidate_id = %drag.candidate_id, %dest_stage_id, "drag-end onto an unknown stage");
            return BeginMove::NoOp;
        }

        let snapshot = self.projection.clone();
        let Some(card) = self.projection.remove(&drag.candidate_id) else {
            return BeginMove::NoOp; // located above; unreachable
        };
        if let Err(card) = self.projection.insert(dest_stage_id, drag.dest_index, card) {
            // Destination existed a moment ago; restore and bail.
            self.projection = snapshot;
            warn!(candidate_id = %card.id, "optimistic insert failed, projection restored");
            return BeginMove::NoOp;
        }

        self.pending.insert(
            drag.candidate_id.clone(),
            PendingMove {
                source_stage_id: current_stage.clone(),
                dest_stage_id: dest_stage_id.to_string(),
                dest_index: drag.dest_index,
            },
        );
        info!(
            candidate_id = %drag.candidate_id,
            from = %current_stage,
            to = %dest_stage_id,
            index = drag.dest_index,
            "optimistic move applied"
        );

        BeginMove::InFlight(MoveTicket {
            candidate_id: drag.candidate_id.clone(),
            dest_stage_id: dest_stage_id.to_string(),
            snapshot,
            epoch: self.epoch,
        })
    }

    /// Applies the outcome of the commit call. Synchronous; always
    /// terminates the candidate's `Pending` state for the ticket's
    /// generation, success and failure alike.
    pub fn complete_move(
        &mut self,
        ticket: MoveTicket,
        commit: Result<(), ApiError>,
    ) -> MoveResolution {
        if ticket.epoch != self.epoch {
            // The board was rebuilt while the commit was in flight; its
            // pending entry is already gone and the snapshot refers to a
            // dead generation.
            debug!(candidate_id = %ticket.candidate_id, "discarding stale move resolution");
            return MoveResolution::Stale;
        }

        self.pending.remove(&ticket.candidate_id);
        match commit {
            Ok(()) => MoveResolution::NeedsRefresh,
            Err(err) => {
                if self.pending.is_empty() {
                    self.projection = ticket.snapshot;
                    info!(candidate_id = %ticket.candidate_id, "move rejected, snapshot restored");
                    MoveResolution::Reverted(err)
                } else {
                    // Restoring the snapshot would also undo the optimistic
                    // state of the still-pending move; converge on the
                    // server instead.
                    info!(
                        candidate_id = %ticket.candidate_id,
                        "move rejected with another move in flight, deferring to refresh"
                    );
                    MoveResolution::NeedsRefreshAfterFailure(err)
                }
            }
        }
    }

    /// Full drag-to-reconciliation sequence: optimistic apply, commit, then
    /// refresh (success) or rollback (failure). A no-op drag returns without
    /// any network call.
    pub async fn perform_move(
        &mut self,
        drag: &DragEnd,
        search: Option<&str>,
    ) -> Result<MoveOutcome, BoardError> {
        let ticket = match self.begin_move(drag) {
            BeginMove::NoOp => return Ok(MoveOutcome::NoOp),
            BeginMove::InFlight(ticket) => ticket,
        };

        let commit = self
            .api
            .move_candidate(&ticket.candidate_id, &ticket.dest_stage_id)
            .await;

        let candidate_id = ticket.candidate_id.clone();
        match self.complete_move(ticket, commit) {
            MoveResolution::NeedsRefresh => {
                self.refresh(search).await?;
                Ok(MoveOutcome::Committed)
            }
            MoveResolution::Reverted(source) => Err(BoardError::MoveCommit {
                candidate_id,
                source,
            }),
            MoveResolution::NeedsRefreshAfterFailure(source) => {
                self.refresh(search).await?;
                Err(BoardError::MoveCommit {
                    candidate_id,
                    source,
                })
            }
            MoveResolution::Stale => Err(BoardError::StaleResponse),
        }
    }
}
