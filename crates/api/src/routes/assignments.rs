//! Admin assignment listing endpoint handler.

use axum::{extract::State, Json};
use domain::models::{AssignmentListResponse, AssignmentRecord, AssignmentResponse};
use persistence::repositories::AssignmentRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::authz;

/// GET /api/v1/admin/assignments
///
/// All assignments with giver and receiver details, newest first.
pub async fn list_assignments(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<AssignmentListResponse>, ApiError> {
    authz::require_admin(&state.pool, &caller.email).await?;

    let repo = AssignmentRepository::new(state.pool.clone());
    let assignments: Vec<AssignmentResponse> = repo
        .list_with_names()
        .await?
        .into_iter()
        .map(|entity| AssignmentResponse::from(AssignmentRecord::from(entity)))
        .collect();

    Ok(Json(AssignmentListResponse {
        count: assignments.len(),
        assignments,
    }))
}
