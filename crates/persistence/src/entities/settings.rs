//! Settings entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the singleton settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingsEntity {
    pub id: String,
    pub organization_name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub homepage_title: String,
    pub homepage_message: String,
    pub smtp_host: Option<String>,
    pub smtp_port: i32,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_secure: bool,
    pub email_from: Option<String>,
    pub email_from_name: String,
    pub email_subject: String,
    pub email_footer: String,
    pub hr_email: Option<String>,
    pub admin_emails: String,
    pub google_enabled: bool,
    pub microsoft_enabled: bool,
    pub setup_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SettingsEntity> for domain::models::Settings {
    fn from(entity: SettingsEntity) -> Self {
        Self {
            organization_name: entity.organization_name,
            logo_url: entity.logo_url,
            primary_color: entity.primary_color,
            secondary_color: entity.secondary_color,
            homepage_title: entity.homepage_title,
            homepage_message: entity.homepage_message,
            smtp_host: entity.smtp_host,
            smtp_port: entity.smtp_port,
            smtp_user: entity.smtp_user,
            smtp_password: entity.smtp_password,
            smtp_secure: entity.smtp_secure,
            email_from: entity.email_from,
            email_from_name: entity.email_from_name,
            email_subject: entity.email_subject,
            email_footer: entity.email_footer,
            hr_email: entity.hr_email,
            admin_emails: entity.admin_emails,
            google_enabled: entity.google_enabled,
            microsoft_enabled: entity.microsoft_enabled,
            setup_complete: entity.setup_complete,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
