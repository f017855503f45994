//! Common validation utilities.

use validator::ValidationError;

/// Maximum accepted length for an email address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Normalizes an email address for storage and lookup.
///
/// Emails are the natural key for participants and must compare
/// case-insensitively, so every write and lookup goes through this.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns true if the value looks like an email address.
///
/// Deliberately permissive: roster uploads come from spreadsheets
/// maintained by hand, and the only hard requirement is that we can
/// deliver mail to the address. Anything with an `@` and some text on
/// both sides passes.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

/// Validates an email field on a request DTO.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if is_plausible_email(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_shape");
        err.message = Some("Must be a valid email address".into());
        Err(err)
    }
}

/// Truncates a string to at most `max` characters, preserving char
/// boundaries.
pub fn clamp_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
