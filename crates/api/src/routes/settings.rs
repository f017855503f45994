//! Settings endpoint handlers.

use axum::{extract::State, Json};
use domain::models::{PublicSettingsResponse, SettingsResponse, UpdateSettingsRequest};
use persistence::repositories::SettingsRepository;
use serde::{Deserialize, Serialize};
use shared::validation::{is_plausible_email, normalize_email};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::authz;
use crate::services::email::EmailNotifier;

/// Request body for a settings test email. `to` defaults to the calling
/// admin's own address.
#[derive(Debug, Deserialize, Default)]
pub struct TestEmailRequest {
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestEmailResponse {
    pub sent: bool,
    pub to: String,
}

/// GET /api/v1/settings
///
/// Public branding and feature flags. Served to everyone, including
/// authenticated non-admins; SMTP fields and the admin list never appear
/// here.
pub async fn get_public_settings(
    State(state): State<AppState>,
) -> Result<Json<PublicSettingsResponse>, ApiError> {
    let settings = authz::load_settings(&state.pool).await?;
    Ok(Json(PublicSettingsResponse::from(&settings)))
}

/// GET /api/v1/admin/settings
///
/// Full settings view for admins, with the SMTP password masked.
pub async fn get_admin_settings(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = authz::require_admin(&state.pool, &caller.email).await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// PUT /api/v1/admin/settings
///
/// Partial update: only supplied fields change. The masked password
/// sentinel leaves the stored secret untouched.
pub async fn update_settings(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let mut settings = authz::require_admin(&state.pool, &caller.email).await?;
    request.validate()?;

    settings.apply_update(request);

    let repo = SettingsRepository::new(state.pool.clone());
    let updated: domain::models::Settings = repo.update(&settings).await?.into();

    tracing::info!(admin = %caller.email, "Settings updated");
    Ok(Json(SettingsResponse::from(&updated)))
}

/// POST /api/v1/admin/settings/test-email
///
/// Sends a test email with the stored SMTP settings so an admin can
/// verify delivery works. Defaults to the caller's own address.
pub async fn send_test_email(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<TestEmailRequest>,
) -> Result<Json<TestEmailResponse>, ApiError> {
    let settings = authz::require_admin(&state.pool, &caller.email).await?;

    if !settings.smtp_configured() {
        return Err(ApiError::Validation(
            "SMTP is not configured; save a host and sender first".to_string(),
        ));
    }

    let to = request
        .to
        .as_deref()
        .map(normalize_email)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| caller.email.clone());
    if !is_plausible_email(&to) {
        return Err(ApiError::Validation(format!("Invalid email address: {to}")));
    }

    let notifier = EmailNotifier::new(state.pool.clone());
    notifier
        .send_test(&to)
        .await
        .map_err(|e| ApiError::Validation(format!("Test email failed: {e}")))?;

    tracing::info!(admin = %caller.email, recipient = %to, "Test email sent");
    Ok(Json(TestEmailResponse { sent: true, to }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_recipient_is_optional() {
        let request: TestEmailRequest = serde_json::from_str("{}").unwrap();
        assert!(request.to.is_none());

        let request: TestEmailRequest =
            serde_json::from_str(r#"{"to": "Admin@Acme.COM"}"#).unwrap();
        assert_eq!(request.to.as_deref(), Some("Admin@Acme.COM"));
    }

    #[test]
    fn test_response_shape() {
        let response = TestEmailResponse {
            sent: true,
            to: "admin@acme.com".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["sent"], true);
        assert_eq!(json["to"], "admin@acme.com");
    }
}
