//! Repository for assignment operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AssignmentEntity, AssignmentRecordEntity, AssignmentWithReceiverEntity};
use crate::metrics::QueryTimer;

/// Repository for assignment database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new assignment. The unique constraints on giver_id and
    /// receiver_id reject duplicates from concurrent draws; callers
    /// inspect the database error to decide whether to retry.
    pub async fn create(
        &self,
        giver_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<AssignmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_assignment");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            INSERT INTO assignments (giver_id, receiver_id)
            VALUES ($1, $2)
            RETURNING id, giver_id, receiver_id, email_sent, assigned_at
            "#,
        )
        .bind(giver_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds the assignment for a giver, joined with the receiver's name.
    pub async fn find_by_giver_with_receiver(
        &self,
        giver_id: Uuid,
    ) -> Result<Option<AssignmentWithReceiverEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_assignment_by_giver");
        let result = sqlx::query_as::<_, AssignmentWithReceiverEntity>(
            r#"
            SELECT a.id, a.giver_id, a.receiver_id, a.email_sent, a.assigned_at,
                   r.name AS receiver_name
            FROM assignments a
            JOIN participants r ON r.id = a.receiver_id
            WHERE a.giver_id = $1
            "#,
        )
        .bind(giver_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists all assignments with giver and receiver details, newest first.
    pub async fn list_with_names(&self) -> Result<Vec<AssignmentRecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_assignments_with_names");
        let result = sqlx::query_as::<_, AssignmentRecordEntity>(
            r#"
            SELECT a.id,
                   g.name AS giver_name, g.email AS giver_email,
                   r.name AS receiver_name, r.email AS receiver_email,
                   a.email_sent, a.assigned_at
            FROM assignments a
            JOIN participants g ON g.id = a.giver_id
            JOIN participants r ON r.id = a.receiver_id
            ORDER BY a.assigned_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the ids of every participant already taken as a receiver.
    pub async fn receiver_ids(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_receiver_ids");
        let result = sqlx::query_scalar::<_, Uuid>("SELECT receiver_id FROM assignments")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Returns the ids of every participant who has already drawn.
    pub async fn giver_ids(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_giver_ids");
        let result = sqlx::query_scalar::<_, Uuid>("SELECT giver_id FROM assignments")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Marks the assignment's notification email as delivered.
    pub async fn mark_email_sent(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_assignment_email_sent");
        let result = sqlx::query("UPDATE assignments SET email_sent = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|_| ());
        timer.record();
        result
    }
}
