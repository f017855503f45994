//! Participation report endpoint handler.

use std::collections::HashSet;

use axum::{extract::State, Json};
use domain::models::{Participant, ParticipationMember, ParticipationResponse, ParticipationStats};
use persistence::repositories::{AssignmentRepository, ParticipantRepository};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::authz;

/// GET /api/v1/admin/participation
///
/// Splits the active roster into members who have drawn and members who
/// haven't, with aggregate stats.
pub async fn get_participation(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ParticipationResponse>, ApiError> {
    authz::require_admin(&state.pool, &caller.email).await?;

    let participants = ParticipantRepository::new(state.pool.clone());
    let assignments = AssignmentRepository::new(state.pool.clone());

    let active: Vec<Participant> = participants
        .list_active()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let givers: HashSet<Uuid> = assignments.giver_ids().await?.into_iter().collect();

    let mut completed_members = Vec::new();
    let mut pending_members = Vec::new();
    for p in &active {
        let member = ParticipationMember {
            id: p.id,
            name: p.name.clone(),
            email: p.email.clone(),
        };
        if givers.contains(&p.id) {
            completed_members.push(member);
        } else {
            pending_members.push(member);
        }
    }

    let stats = ParticipationStats::new(active.len(), completed_members.len());

    Ok(Json(ParticipationResponse {
        stats,
        pending_members,
        completed_members,
    }))
}
