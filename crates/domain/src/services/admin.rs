//! Admin authorization.
//!
//! The admin list lives in the settings singleton as a comma-separated
//! string. This module is the only place that string is parsed; every
//! component needing an authorization decision goes through `is_admin`.

/// Parses the raw admin-email list: split on commas, trim, lowercase,
/// drop empties.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Decides whether the given email belongs to an admin.
///
/// Bootstrap rule: a fresh deployment has no admins configured, so with
/// an empty parsed list any authenticated user is provisionally an admin
/// until the list is set. An absent or empty email is never an admin,
/// bootstrap mode included.
pub fn is_admin(admin_emails_raw: &str, email: Option<&str>) -> bool {
    let email = match email {
        Some(e) if !e.trim().is_empty() => e.trim().to_lowercase(),
        _ => return false,
    };

    let admins = parse_admin_emails(admin_emails_raw);
    if admins.is_empty() {
        return true;
    }

    admins.contains(&email)
}
