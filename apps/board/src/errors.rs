use thiserror::Error;

use crate::api::ApiError;

/// Error taxonomy of the board core.
///
/// `Load` is fatal to the board render: the shell replaces the board with an
/// error panel plus a manual retry action. `MoveCommit` is recoverable: the
/// projection has already been reconciled (snapshot restore or refresh) and
/// the shell shows a dismissible banner with the card back in place. Neither
/// kind is retried automatically — retry is a deliberate user action.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board load failed: {source}")]
    Load {
        #[source]
        source: ApiError,
    },

    #[error("could not move candidate {candidate_id}: {source}")]
    MoveCommit {
        candidate_id: String,
        #[source]
        source: ApiError,
    },

    /// A load resolved after the board moved on to a newer generation
    /// (refresh or teardown while the request was in flight). The result is
    /// discarded; the shell must not surface this to the user.
    #[error("response discarded: the board was refreshed while the request was in flight")]
    StaleResponse,
}
