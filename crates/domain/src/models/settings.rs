//! Singleton settings domain models.
//!
//! One settings row (fixed id) holds branding, mail transport, the admin
//! email list, and feature flags. It is created lazily with defaults on
//! first read and updated field-by-field: only fields present in an
//! update request change, and the SMTP password accepts a sentinel value
//! meaning "leave unchanged" so a masked read can be round-tripped
//! through an edit form without wiping the stored secret.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::clamp_chars;
use validator::Validate;

/// Fixed primary key of the singleton settings row.
pub const SETTINGS_ID: &str = "singleton";

/// Sentinel returned in place of the stored SMTP password, and accepted
/// on write as "leave unchanged".
pub const MASKED_PASSWORD: &str = "********";

/// Internal representation of the settings singleton.
#[derive(Debug, Clone)]
pub struct Settings {
    // Identity & branding
    pub organization_name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub homepage_title: String,
    pub homepage_message: String,

    // Mail transport
    pub smtp_host: Option<String>,
    pub smtp_port: i32,
    pub smtp_user: Option<String>,
    /// Internal only, never exposed in API responses.
    pub smtp_password: Option<String>,
    pub smtp_secure: bool,
    pub email_from: Option<String>,
    pub email_from_name: String,
    pub email_subject: String,
    pub email_footer: String,
    pub hr_email: Option<String>,

    // Authorization
    /// Comma-separated admin email list; parsed only by
    /// `services::admin`.
    pub admin_emails: String,

    // Feature flags
    pub google_enabled: bool,
    pub microsoft_enabled: bool,
    pub setup_complete: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// True once a host, user and password are all configured.
    pub fn smtp_configured(&self) -> bool {
        self.smtp_host.as_deref().is_some_and(|h| !h.is_empty())
            && self.smtp_user.as_deref().is_some_and(|u| !u.is_empty())
            && self.smtp_password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Applies a partial update in place. Only supplied fields change;
    /// string fields are clamped to their storage limits.
    pub fn apply_update(&mut self, update: UpdateSettingsRequest) {
        if let Some(v) = update.organization_name {
            self.organization_name = clamp_chars(&v, 100);
        }
        if let Some(v) = update.logo_url {
            self.logo_url = non_empty(clamp_chars(&v, 500));
        }
        if let Some(v) = update.primary_color {
            self.primary_color = clamp_chars(&v, 20);
        }
        if let Some(v) = update.secondary_color {
            self.secondary_color = clamp_chars(&v, 20);
        }
        if let Some(v) = update.homepage_title {
            self.homepage_title = clamp_chars(&v, 100);
        }
        if let Some(v) = update.homepage_message {
            self.homepage_message = clamp_chars(&v, 500);
        }

        if let Some(v) = update.smtp_host {
            self.smtp_host = non_empty(clamp_chars(&v, 100));
        }
        if let Some(v) = update.smtp_port {
            self.smtp_port = v.clamp(1, 65535);
        }
        if let Some(v) = update.smtp_user {
            self.smtp_user = non_empty(clamp_chars(&v, 200));
        }
        if let Some(v) = update.smtp_password {
            // The mask means the form echoed back an unchanged secret.
            if v != MASKED_PASSWORD {
                self.smtp_password = non_empty(clamp_chars(&v, 200));
            }
        }
        if let Some(v) = update.smtp_secure {
            self.smtp_secure = v;
        }
        if let Some(v) = update.email_from {
            self.email_from = non_empty(clamp_chars(&v, 200));
        }
        if let Some(v) = update.email_from_name {
            self.email_from_name = clamp_chars(&v, 100);
        }
        if let Some(v) = update.email_subject {
            self.email_subject = clamp_chars(&v, 200);
        }
        if let Some(v) = update.email_footer {
            self.email_footer = clamp_chars(&v, 500);
        }
        if let Some(v) = update.hr_email {
            self.hr_email = non_empty(clamp_chars(&v, 200));
        }

        if let Some(v) = update.admin_emails {
            self.admin_emails = clamp_chars(&v, 1000);
        }

        if let Some(v) = update.google_enabled {
            self.google_enabled = v;
        }
        if let Some(v) = update.microsoft_enabled {
            self.microsoft_enabled = v;
        }
        if let Some(v) = update.setup_complete {
            self.setup_complete = v;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// PUT request updating the settings singleton. Every field is optional;
/// absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSettingsRequest {
    pub organization_name: Option<String>,
    pub logo_url: Option<String>,
    #[validate(regex(path = "*HEX_COLOR_REGEX", message = "Must be a hex color"))]
    pub primary_color: Option<String>,
    #[validate(regex(path = "*HEX_COLOR_REGEX", message = "Must be a hex color"))]
    pub secondary_color: Option<String>,
    pub homepage_title: Option<String>,
    pub homepage_message: Option<String>,

    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_secure: Option<bool>,
    pub email_from: Option<String>,
    pub email_from_name: Option<String>,
    pub email_subject: Option<String>,
    pub email_footer: Option<String>,
    pub hr_email: Option<String>,

    pub admin_emails: Option<String>,

    pub google_enabled: Option<bool>,
    pub microsoft_enabled: Option<bool>,
    pub setup_complete: Option<bool>,
}

/// Restricted settings view safe for unauthenticated callers: branding
/// and feature flags only, never mail transport or the admin list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicSettingsResponse {
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub homepage_title: String,
    pub homepage_message: String,
    pub google_enabled: bool,
    pub microsoft_enabled: bool,
    pub setup_complete: bool,
}

impl From<&Settings> for PublicSettingsResponse {
    fn from(settings: &Settings) -> Self {
        Self {
            name: settings.organization_name.clone(),
            logo_url: settings.logo_url.clone(),
            primary_color: settings.primary_color.clone(),
            secondary_color: settings.secondary_color.clone(),
            homepage_title: settings.homepage_title.clone(),
            homepage_message: settings.homepage_message.clone(),
            google_enabled: settings.google_enabled,
            microsoft_enabled: settings.microsoft_enabled,
            setup_complete: settings.setup_complete,
        }
    }
}

/// Full settings view for admins. The SMTP password is masked when set
/// and null otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsResponse {
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
    pub updated_at: DateTime<Utc>,
}

impl From<&Settings> for SettingsResponse {
    fn from(settings: &Settings) -> Self {
        Self {
            organization_name: settings.organization_name.clone(),
            logo_url: settings.logo_url.clone(),
            primary_color: settings.primary_color.clone(),
            secondary_color: settings.secondary_color.clone(),
            homepage_title: settings.homepage_title.clone(),
            homepage_message: settings.homepage_message.clone(),
            smtp_host: settings.smtp_host.clone(),
            smtp_port: settings.smtp_port,
            smtp_user: settings.smtp_user.clone(),
            smtp_password: settings
                .smtp_password
                .as_ref()
                .map(|_| MASKED_PASSWORD.to_string()),
            smtp_secure: settings.smtp_secure,
            email_from: settings.email_from.clone(),
            email_from_name: settings.email_from_name.clone(),
            email_subject: settings.email_subject.clone(),
            email_footer: settings.email_footer.clone(),
            hr_email: settings.hr_email.clone(),
            admin_emails: settings.admin_emails.clone(),
            google_enabled: settings.google_enabled,
            microsoft_enabled: settings.microsoft_enabled,
            setup_complete: settings.setup_complete,
            updated_at: settings.updated_at,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#[0-9a-fA-F]{3,8}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> Settings {
        Settings {
            organization_name: "My Organization".to_string(),
            logo_url: None,
            primary_color: "#D42426".to_string(),
            secondary_color: "#2F5233".to_string(),
            homepage_title: "Secret Santa".to_string(),
            homepage_message: "Draw a name and spread some cheer!".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            smtp_secure: false,
            email_from: None,
            email_from_name: "Secret Santa".to_string(),
            email_subject: "Your Secret Santa Assignment!".to_string(),
            email_footer: "Happy Holidays!".to_string(),
            hr_email: None,
            admin_emails: String::new(),
            google_enabled: true,
            microsoft_enabled: true,
            setup_complete: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_update_leaves_absent_fields() {
        let mut settings = sample_settings();
        settings.apply_update(UpdateSettingsRequest {
            organization_name: Some("Acme".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.organization_name, "Acme");
        assert_eq!(settings.primary_color, "#D42426");
        assert_eq!(settings.smtp_port, 587);
    }

    #[test]
    fn test_password_sentinel_preserves_secret() {
        let mut settings = sample_settings();
        settings.smtp_password = Some("hunter2".to_string());
        settings.apply_update(UpdateSettingsRequest {
            smtp_password: Some(MASKED_PASSWORD.to_string()),
            ..Default::default()
        });
        assert_eq!(settings.smtp_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_empty_password_clears_secret() {
        let mut settings = sample_settings();
        settings.smtp_password = Some("hunter2".to_string());
        settings.apply_update(UpdateSettingsRequest {
            smtp_password: Some(String::new()),
            ..Default::default()
        });
        assert!(settings.smtp_password.is_none());
    }

    #[test]
    fn test_new_password_replaces_secret() {
        let mut settings = sample_settings();
        settings.smtp_password = Some("hunter2".to_string());
        settings.apply_update(UpdateSettingsRequest {
            smtp_password: Some("correct-horse".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.smtp_password.as_deref(), Some("correct-horse"));
    }

    #[test]
    fn test_smtp_port_clamped() {
        let mut settings = sample_settings();
        settings.apply_update(UpdateSettingsRequest {
            smtp_port: Some(0),
            ..Default::default()
        });
        assert_eq!(settings.smtp_port, 1);

        settings.apply_update(UpdateSettingsRequest {
            smtp_port: Some(70000),
            ..Default::default()
        });
        assert_eq!(settings.smtp_port, 65535);
    }

    #[test]
    fn test_long_fields_clamped() {
        let mut settings = sample_settings();
        settings.apply_update(UpdateSettingsRequest {
            organization_name: Some("x".repeat(500)),
            ..Default::default()
        });
        assert_eq!(settings.organization_name.chars().count(), 100);
    }

    #[test]
    fn test_masked_password_in_full_response() {
        let mut settings = sample_settings();
        settings.smtp_password = Some("hunter2".to_string());
        let response = SettingsResponse::from(&settings);
        assert_eq!(response.smtp_password.as_deref(), Some(MASKED_PASSWORD));

        settings.smtp_password = None;
        let response = SettingsResponse::from(&settings);
        assert!(response.smtp_password.is_none());
    }

    #[test]
    fn test_public_view_has_no_smtp_fields() {
        let mut settings = sample_settings();
        settings.smtp_password = Some("hunter2".to_string());
        settings.admin_emails = "a@x.com".to_string();
        let json = serde_json::to_string(&PublicSettingsResponse::from(&settings)).unwrap();
        assert!(!json.contains("smtp"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("admin_emails"));
        assert!(json.contains("\"name\":\"My Organization\""));
    }

    #[test]
    fn test_smtp_configured() {
        let mut settings = sample_settings();
        assert!(!settings.smtp_configured());

        settings.smtp_host = Some("smtp.example.com".to_string());
        settings.smtp_user = Some("santa".to_string());
        settings.smtp_password = Some("hunter2".to_string());
        assert!(settings.smtp_configured());
    }

    #[test]
    fn test_hex_color_validation() {
        let request = UpdateSettingsRequest {
            primary_color: Some("#D42426".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let request = UpdateSettingsRequest {
            primary_color: Some("red".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
