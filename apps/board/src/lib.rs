//! Client-side core of the recruiting workflow kanban board.
//!
//! The server owns every "candidate is in stage X" fact. This crate keeps an
//! ephemeral, fully rebuildable projection of those facts, applies drag moves
//! optimistically so the UI stays responsive, commits them over HTTP, and
//! reconciles the outcome: a fresh load on success, a snapshot rollback on
//! failure. Rendering code reads the projection but never mutates it; every
//! mutation goes through the move coordinator.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod loader;
pub mod models;
pub mod overlay;
pub mod projection;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, HttpWorkflowApi, NotesApi, WorkflowApi};
pub use config::BoardConfig;
pub use coordinator::{
    BeginMove, Board, DragEnd, MoveOutcome, MoveResolution, MoveState, MoveTicket, PendingMove,
};
pub use errors::BoardError;
pub use loader::load_board;
pub use projection::{Projection, StageColumn};
