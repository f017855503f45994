//! Assignment entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: Uuid,
    pub giver_id: Uuid,
    pub receiver_id: Uuid,
    pub email_sent: bool,
    pub assigned_at: DateTime<Utc>,
}

/// An assignment row joined with the receiver's display name, used for
/// the idempotent re-entry path of a draw.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentWithReceiverEntity {
    pub id: Uuid,
    pub giver_id: Uuid,
    pub receiver_id: Uuid,
    pub email_sent: bool,
    pub assigned_at: DateTime<Utc>,
    pub receiver_name: String,
}

/// An assignment row joined with both participants, for admin listings.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRecordEntity {
    pub id: Uuid,
    pub giver_name: String,
    pub giver_email: String,
    pub receiver_name: String,
    pub receiver_email: String,
    pub email_sent: bool,
    pub assigned_at: DateTime<Utc>,
}

impl From<AssignmentEntity> for domain::models::Assignment {
    fn from(entity: AssignmentEntity) -> Self {
        Self {
            id: entity.id,
            giver_id: entity.giver_id,
            receiver_id: entity.receiver_id,
            email_sent: entity.email_sent,
            assigned_at: entity.assigned_at,
        }
    }
}

impl From<AssignmentRecordEntity> for domain::models::AssignmentRecord {
    fn from(entity: AssignmentRecordEntity) -> Self {
        Self {
            id: entity.id,
            giver_name: entity.giver_name,
            giver_email: entity.giver_email,
            receiver_name: entity.receiver_name,
            receiver_email: entity.receiver_email,
            email_sent: entity.email_sent,
            assigned_at: entity.assigned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain() {
        let entity = AssignmentEntity {
            id: Uuid::new_v4(),
            giver_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            email_sent: false,
            assigned_at: Utc::now(),
        };

        let assignment: domain::models::Assignment = entity.clone().into();
        assert_eq!(assignment.giver_id, entity.giver_id);
        assert_eq!(assignment.receiver_id, entity.receiver_id);
        assert!(!assignment.email_sent);
    }

    #[test]
    fn test_record_entity_to_domain() {
        let entity = AssignmentRecordEntity {
            id: Uuid::new_v4(),
            giver_name: "Alice".to_string(),
            giver_email: "a@x.com".to_string(),
            receiver_name: "Bob".to_string(),
            receiver_email: "b@x.com".to_string(),
            email_sent: true,
            assigned_at: Utc::now(),
        };

        let record: domain::models::AssignmentRecord = entity.into();
        assert_eq!(record.giver_name, "Alice");
        assert_eq!(record.receiver_email, "b@x.com");
    }
}
