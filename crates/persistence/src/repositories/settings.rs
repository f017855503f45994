//! Repository for the singleton settings row.

use domain::models::{Settings, SETTINGS_ID};
use sqlx::PgPool;

use crate::entities::SettingsEntity;
use crate::metrics::QueryTimer;

const SETTINGS_COLUMNS: &str = r#"id, organization_name, logo_url, primary_color, secondary_color,
                   homepage_title, homepage_message,
                   smtp_host, smtp_port, smtp_user, smtp_password, smtp_secure,
                   email_from, email_from_name, email_subject, email_footer, hr_email,
                   admin_emails, google_enabled, microsoft_enabled, setup_complete,
                   created_at, updated_at"#;

/// Repository for settings database operations.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the settings row if it exists.
    pub async fn get(&self) -> Result<Option<SettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_settings");
        let result = sqlx::query_as::<_, SettingsEntity>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = $1"
        ))
        .bind(SETTINGS_ID)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetches the settings row, creating it with column defaults on
    /// first access. The upsert makes concurrent first reads safe.
    pub async fn get_or_create(&self) -> Result<SettingsEntity, sqlx::Error> {
        if let Some(settings) = self.get().await? {
            return Ok(settings);
        }

        let timer = QueryTimer::new("create_default_settings");
        let result = sqlx::query_as::<_, SettingsEntity>(&format!(
            r#"
            INSERT INTO settings (id)
            VALUES ($1)
            ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(SETTINGS_ID)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persists a fully merged settings value over the singleton row.
    pub async fn update(&self, settings: &Settings) -> Result<SettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_settings");
        let result = sqlx::query_as::<_, SettingsEntity>(&format!(
            r#"
            UPDATE settings SET
                organization_name = $2,
                logo_url = $3,
                primary_color = $4,
                secondary_color = $5,
                homepage_title = $6,
                homepage_message = $7,
                smtp_host = $8,
                smtp_port = $9,
                smtp_user = $10,
                smtp_password = $11,
                smtp_secure = $12,
                email_from = $13,
                email_from_name = $14,
                email_subject = $15,
                email_footer = $16,
                hr_email = $17,
                admin_emails = $18,
                google_enabled = $19,
                microsoft_enabled = $20,
                setup_complete = $21,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(SETTINGS_ID)
        .bind(&settings.organization_name)
        .bind(&settings.logo_url)
        .bind(&settings.primary_color)
        .bind(&settings.secondary_color)
        .bind(&settings.homepage_title)
        .bind(&settings.homepage_message)
        .bind(&settings.smtp_host)
        .bind(settings.smtp_port)
        .bind(&settings.smtp_user)
        .bind(&settings.smtp_password)
        .bind(settings.smtp_secure)
        .bind(&settings.email_from)
        .bind(&settings.email_from_name)
        .bind(&settings.email_subject)
        .bind(&settings.email_footer)
        .bind(&settings.hr_email)
        .bind(&settings.admin_emails)
        .bind(settings.google_enabled)
        .bind(settings.microsoft_enabled)
        .bind(settings.setup_complete)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
