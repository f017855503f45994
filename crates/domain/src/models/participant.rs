//! Participant domain models.
//!
//! A participant is anyone eligible to give and receive a gift. The
//! roster is replaced wholesale on each admin upload: participants are
//! deactivated rather than deleted, and the lowercased email address is
//! the natural key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{is_plausible_email, normalize_email};
use uuid::Uuid;
use validator::Validate;

/// Internal representation of a participant.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    /// Stored lowercased; compared case-insensitively everywhere.
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of an uploaded roster, as parsed from the tabular file by the
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterEntryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// POST request replacing the whole roster.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RosterUploadRequest {
    #[validate(length(min = 1, message = "Roster upload must contain at least one row"))]
    pub entries: Vec<RosterEntryInput>,
}

/// A validated, normalized roster row ready to be upserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub email: String,
}

impl RosterEntry {
    /// Validates and normalizes a raw upload row.
    ///
    /// Rows missing a name or email, or whose email has no `@`, are
    /// dropped rather than failing the whole upload.
    pub fn from_input(input: &RosterEntryInput) -> Option<Self> {
        let name = input.name.trim();
        if name.is_empty() || !is_plausible_email(&input.email) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            email: normalize_email(&input.email),
        })
    }
}

/// Participant fields exposed over the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            is_active: p.is_active,
        }
    }
}

/// Response for a roster replacement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterReplaceResponse {
    /// Number of rows accepted after filtering.
    pub count: usize,
    pub participants: Vec<ParticipantResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str) -> RosterEntryInput {
        RosterEntryInput {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_roster_entry_normalizes() {
        let entry = RosterEntry::from_input(&input("  Alice  ", " Alice@X.COM ")).unwrap();
        assert_eq!(entry.name, "Alice");
        assert_eq!(entry.email, "alice@x.com");
    }

    #[test]
    fn test_roster_entry_rejects_missing_name() {
        assert!(RosterEntry::from_input(&input("", "a@x.com")).is_none());
        assert!(RosterEntry::from_input(&input("   ", "a@x.com")).is_none());
    }

    #[test]
    fn test_roster_entry_rejects_bad_email() {
        assert!(RosterEntry::from_input(&input("Alice", "")).is_none());
        assert!(RosterEntry::from_input(&input("Alice", "no-at-sign")).is_none());
    }

    #[test]
    fn test_upload_request_requires_rows() {
        let request = RosterUploadRequest { entries: vec![] };
        assert!(request.validate().is_err());

        let request = RosterUploadRequest {
            entries: vec![input("Alice", "a@x.com")],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_upload_request_deserialization_tolerates_missing_fields() {
        let json = r#"{"entries": [{"name": "Alice"}, {"email": "b@x.com"}]}"#;
        let request: RosterUploadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.entries.len(), 2);
        assert!(RosterEntry::from_input(&request.entries[0]).is_none());
        assert!(RosterEntry::from_input(&request.entries[1]).is_none());
    }
}
