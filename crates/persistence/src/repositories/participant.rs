//! Repository for participant operations.

use domain::models::RosterEntry;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ParticipantEntity;
use crate::metrics::QueryTimer;

/// Repository for participant database operations.
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds an active participant by email. The caller must pass a
    /// normalized (lowercased, trimmed) address.
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_participant_by_email");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            SELECT id, name, email, is_active, created_at, updated_at
            FROM participants
            WHERE email = $1 AND is_active
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists all active participants ordered by name.
    pub async fn list_active(&self) -> Result<Vec<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_participants");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            SELECT id, name, email, is_active, created_at, updated_at
            FROM participants
            WHERE is_active
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetches active participants matching the given ids.
    pub async fn find_active_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_participants_by_ids");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            SELECT id, name, email, is_active, created_at, updated_at
            FROM participants
            WHERE id = ANY($1) AND is_active
            ORDER BY name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replaces the roster in a single transaction: every participant is
    /// deactivated, then the provided entries are upserted by email and
    /// reactivated. A failure anywhere rolls the whole replacement back.
    pub async fn replace_roster(
        &self,
        entries: &[RosterEntry],
    ) -> Result<Vec<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_roster");
        let result = self.replace_roster_inner(entries).await;
        timer.record();
        result
    }

    async fn replace_roster_inner(
        &self,
        entries: &[RosterEntry],
    ) -> Result<Vec<ParticipantEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE participants
            SET is_active = FALSE, updated_at = NOW()
            WHERE is_active
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let mut upserted = Vec::with_capacity(entries.len());
        for entry in entries {
            let participant = sqlx::query_as::<_, ParticipantEntity>(
                r#"
                INSERT INTO participants (name, email, is_active)
                VALUES ($1, $2, TRUE)
                ON CONFLICT (email) DO UPDATE SET
                    name = EXCLUDED.name,
                    is_active = TRUE,
                    updated_at = NOW()
                RETURNING id, name, email, is_active, created_at, updated_at
                "#,
            )
            .bind(&entry.name)
            .bind(&entry.email)
            .fetch_one(&mut *tx)
            .await?;
            upserted.push(participant);
        }

        tx.commit().await?;
        Ok(upserted)
    }
}
