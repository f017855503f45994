//! Roster replacement endpoint handler.

use axum::{extract::State, Json};
use domain::models::{
    Participant, ParticipantResponse, RosterEntry, RosterReplaceResponse, RosterUploadRequest,
};
use persistence::repositories::ParticipantRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::authz;

/// POST /api/v1/admin/roster
///
/// Replaces the whole roster in one transaction: every active participant
/// is deactivated, then the valid upload rows are upserted by email and
/// reactivated. Rows without a usable name or email are dropped; an
/// upload with no surviving rows is rejected.
pub async fn replace_roster(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<RosterUploadRequest>,
) -> Result<Json<RosterReplaceResponse>, ApiError> {
    authz::require_admin(&state.pool, &caller.email).await?;
    request.validate()?;

    let entries: Vec<RosterEntry> = request
        .entries
        .iter()
        .filter_map(RosterEntry::from_input)
        .collect();
    let dropped = request.entries.len() - entries.len();
    if entries.is_empty() {
        return Err(ApiError::Validation(
            "No valid roster rows: every row needs a name and an email address".to_string(),
        ));
    }
    if dropped > 0 {
        tracing::warn!(dropped, "Roster upload rows dropped during validation");
    }

    let repo = ParticipantRepository::new(state.pool.clone());
    let participants: Vec<ParticipantResponse> = repo
        .replace_roster(&entries)
        .await?
        .into_iter()
        .map(|entity| ParticipantResponse::from(Participant::from(entity)))
        .collect();

    tracing::info!(
        admin = %caller.email,
        count = participants.len(),
        "Roster replaced"
    );
    Ok(Json(RosterReplaceResponse {
        count: participants.len(),
        participants,
    }))
}
