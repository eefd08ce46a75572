//! Board load pipeline: stage directory first, then a concurrent per-stage
//! roster fan-out, then pure assembly.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::api::{ApiError, WorkflowApi};
use crate::errors::BoardError;
use crate::projection::Projection;

/// Loads the full board from the server.
///
/// All-or-nothing: a failure in the stage load or in any single roster load
/// fails the aggregate, so a partially populated board is never rendered as
/// if it were complete — a wrong candidate count is worse than an error
/// panel.
pub async fn load_board(
    api: &Arc<dyn WorkflowApi>,
    organization_id: &str,
    search: Option<&str>,
) -> Result<Projection, BoardError> {
    let stages = api
        .list_stages(organization_id)
        .await
        .map_err(|source| BoardError::Load { source })?;
    debug!(stage_count = stages.len(), "stage directory loaded");

    // One roster request per stage, issued simultaneously. try_join_all is
    // fail-fast: the first rejection aborts the aggregate load.
    let rosters = try_join_all(stages.iter().map(|stage| {
        let stage_id = stage.id.clone();
        async move {
            let candidates = api.list_candidates(&stage_id, search).await?;
            Ok::<_, ApiError>((stage_id, candidates))
        }
    }))
    .await
    .map_err(|source| BoardError::Load { source })?;

    let rosters: HashMap<_, _> = rosters.into_iter().collect();
    let projection = Projection::assemble(stages, rosters);
    info!(
        columns = projection.columns().len(),
        candidates = projection.candidate_count(),
        "board projection assembled"
    );
    Ok(projection)
}
