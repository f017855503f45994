//! Admin authorization gate.
//!
//! Admin access is decided by the comma-separated `admin_emails` list on
//! the settings row, reloaded on every check. While the list is empty the
//! deployment is in bootstrap mode and any authenticated caller is
//! accepted, so the first admin can enroll themselves.

use domain::models::Settings;
use domain::services::is_admin;
use persistence::repositories::SettingsRepository;
use sqlx::PgPool;

use crate::error::ApiError;

/// Loads the settings singleton, creating it on first access.
pub async fn load_settings(pool: &PgPool) -> Result<Settings, ApiError> {
    let repo = SettingsRepository::new(pool.clone());
    let entity = repo.get_or_create().await?;
    Ok(entity.into())
}

/// Verifies the caller is an admin, returning the loaded settings so
/// handlers don't fetch them twice.
pub async fn require_admin(pool: &PgPool, email: &str) -> Result<Settings, ApiError> {
    let settings = load_settings(pool).await?;
    if !is_admin(&settings.admin_emails, Some(email)) {
        tracing::warn!(caller = %email, "Admin access denied");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(settings)
}
