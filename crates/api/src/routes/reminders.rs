//! Reminder dispatch endpoint handler.

use std::collections::HashSet;

use axum::{extract::State, Json};
use domain::models::Participant;
use persistence::repositories::{AssignmentRepository, ParticipantRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::authz;
use crate::services::email::EmailNotifier;

/// POST request for sending reminders. Without `member_ids` every pending
/// participant gets one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ReminderRequest {
    #[serde(default)]
    pub member_ids: Option<Vec<Uuid>>,

    #[serde(default)]
    #[validate(length(max = 500, message = "Custom message too long"))]
    pub custom_message: Option<String>,
}

/// Per-batch delivery outcome.
#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub sent: usize,
    pub failed: usize,
}

/// POST /api/v1/admin/reminders
///
/// Sends reminder emails to participants who haven't drawn yet. Delivery
/// failures are counted per recipient, not fatal to the batch.
pub async fn send_reminders(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<ReminderRequest>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let settings = authz::require_admin(&state.pool, &caller.email).await?;
    request.validate()?;

    if !settings.smtp_configured() {
        return Err(ApiError::Validation(
            "SMTP is not configured; set it up in settings first".to_string(),
        ));
    }

    let participants = ParticipantRepository::new(state.pool.clone());
    let assignments = AssignmentRepository::new(state.pool.clone());

    let active: Vec<Participant> = match &request.member_ids {
        Some(ids) => participants.find_active_by_ids(ids).await?,
        None => participants.list_active().await?,
    }
    .into_iter()
    .map(Into::into)
    .collect();
    let givers: HashSet<Uuid> = assignments.giver_ids().await?.into_iter().collect();

    let pending: Vec<&Participant> = active.iter().filter(|p| !givers.contains(&p.id)).collect();

    let notifier = EmailNotifier::new(state.pool.clone());
    let custom_message = request.custom_message.as_deref();

    let mut sent = 0;
    let mut failed = 0;
    for participant in pending {
        match notifier
            .send_reminder(&participant.name, &participant.email, custom_message)
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => {
                tracing::warn!(
                    recipient = %participant.email,
                    error = %e,
                    "Reminder delivery failed"
                );
                failed += 1;
            }
        }
    }

    tracing::info!(admin = %caller.email, sent, failed, "Reminder batch finished");
    Ok(Json(ReminderResponse { sent, failed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_request_defaults() {
        let request: ReminderRequest = serde_json::from_str("{}").unwrap();
        assert!(request.member_ids.is_none());
        assert!(request.custom_message.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_reminder_request_rejects_long_message() {
        let request = ReminderRequest {
            member_ids: None,
            custom_message: Some("x".repeat(501)),
        };
        assert!(request.validate().is_err());
    }
}
