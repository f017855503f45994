//! Assignment domain models.
//!
//! An assignment is one directed giver → receiver edge. The full set of
//! assignments must never contain two edges sharing a giver, two edges
//! sharing a receiver, or a self-edge; the database enforces all three.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Internal representation of an assignment.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub id: Uuid,
    pub giver_id: Uuid,
    pub receiver_id: Uuid,
    /// Whether the notification email reached the transport. Stays false
    /// on dispatch failure so recovery tooling can retry.
    pub email_sent: bool,
    pub assigned_at: DateTime<Utc>,
}

/// An assignment joined with both participants, for admin listings.
#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub giver_name: String,
    pub giver_email: String,
    pub receiver_name: String,
    pub receiver_email: String,
    pub email_sent: bool,
    pub assigned_at: DateTime<Utc>,
}

/// Response for a draw request.
///
/// Only the receiver's display name is revealed; the receiver's email is
/// deliberately withheld from the giver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DrawResponse {
    pub receiver: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_assigned: bool,
}

/// One participant reference in an admin assignment listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentParty {
    pub name: String,
    pub email: String,
}

/// One row of the admin assignment listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub giver: AssignmentParty,
    pub receiver: AssignmentParty,
    pub assigned_at: DateTime<Utc>,
    pub email_sent: bool,
}

impl From<AssignmentRecord> for AssignmentResponse {
    fn from(record: AssignmentRecord) -> Self {
        Self {
            id: record.id,
            giver: AssignmentParty {
                name: record.giver_name,
                email: record.giver_email,
            },
            receiver: AssignmentParty {
                name: record.receiver_name,
                email: record.receiver_email,
            },
            assigned_at: record.assigned_at,
            email_sent: record.email_sent,
        }
    }
}

/// Response for the admin assignment listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentListResponse {
    pub count: usize,
    pub assignments: Vec<AssignmentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_response_omits_flag_for_fresh_draw() {
        let response = DrawResponse {
            receiver: "Bob".to_string(),
            already_assigned: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"receiver":"Bob"}"#);
    }

    #[test]
    fn test_draw_response_includes_flag_on_reentry() {
        let response = DrawResponse {
            receiver: "Bob".to_string(),
            already_assigned: true,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"already_assigned\":true"));
    }

    #[test]
    fn test_assignment_record_to_response() {
        let record = AssignmentRecord {
            id: Uuid::new_v4(),
            giver_name: "Alice".to_string(),
            giver_email: "a@x.com".to_string(),
            receiver_name: "Bob".to_string(),
            receiver_email: "b@x.com".to_string(),
            email_sent: true,
            assigned_at: Utc::now(),
        };

        let response: AssignmentResponse = record.into();
        assert_eq!(response.giver.name, "Alice");
        assert_eq!(response.receiver.email, "b@x.com");
        assert!(response.email_sent);
    }
}
