//! Draw orchestration.
//!
//! Ties the pure candidate-pool logic to storage: resolve the caller,
//! return an existing assignment idempotently, otherwise pick a receiver
//! and insert under the database's unique constraints. A receiver
//! collision from a concurrent draw is retried with a fresh pool, at most
//! [`MAX_DRAW_ATTEMPTS`] times. Notification dispatch happens strictly
//! after the insert and never fails the draw.
//!
//! Storage is reached through [`DrawStore`] so the orchestration can be
//! exercised against an in-memory store in tests; [`PgDrawStore`] is the
//! production implementation over the sqlx repositories.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::models::{Assignment, DrawResponse, Participant};
use domain::services::draw::{candidate_pool, pick_uniform, MAX_DRAW_ATTEMPTS};
use domain::services::{AssignmentNotification, AssignmentNotifier};
use persistence::repositories::{AssignmentRepository, ParticipantRepository};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Bound on how long a post-draw notification may take before the draw
/// response is returned without it.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Caller is not an active participant")]
    NotAuthorized,

    #[error("No available participants to draw")]
    NoCandidates,

    #[error("Concurrent draws exhausted the retry budget")]
    RaceConflict,

    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

/// Storage failures the draw loop dispatches on. Duplicate-key outcomes
/// are classified here so the orchestration never inspects database
/// error codes itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Giver already has an assignment")]
    DuplicateGiver,

    #[error("Receiver already taken")]
    DuplicateReceiver,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for DrawError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateGiver | StoreError::DuplicateReceiver => DrawError::RaceConflict,
            StoreError::Database(e) => DrawError::Persistence(e),
        }
    }
}

/// Storage seam for the draw.
#[async_trait]
pub trait DrawStore: Send + Sync {
    async fn find_active_participant(&self, email: &str)
        -> Result<Option<Participant>, StoreError>;
    async fn list_active_participants(&self) -> Result<Vec<Participant>, StoreError>;
    /// The receiver's display name for an existing assignment, if any.
    async fn receiver_name_for_giver(&self, giver_id: Uuid) -> Result<Option<String>, StoreError>;
    async fn taken_receiver_ids(&self) -> Result<Vec<Uuid>, StoreError>;
    async fn insert_assignment(
        &self,
        giver_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Assignment, StoreError>;
    async fn record_email_sent(&self, assignment_id: Uuid) -> Result<(), StoreError>;
}

/// Postgres-backed store; classifies 23505 violations by constraint name.
pub struct PgDrawStore {
    participants: ParticipantRepository,
    assignments: AssignmentRepository,
}

impl PgDrawStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            participants: ParticipantRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool),
        }
    }
}

#[async_trait]
impl DrawStore for PgDrawStore {
    async fn find_active_participant(
        &self,
        email: &str,
    ) -> Result<Option<Participant>, StoreError> {
        Ok(self
            .participants
            .find_active_by_email(email)
            .await?
            .map(Into::into))
    }

    async fn list_active_participants(&self) -> Result<Vec<Participant>, StoreError> {
        Ok(self
            .participants
            .list_active()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn receiver_name_for_giver(&self, giver_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self
            .assignments
            .find_by_giver_with_receiver(giver_id)
            .await?
            .map(|a| a.receiver_name))
    }

    async fn taken_receiver_ids(&self) -> Result<Vec<Uuid>, StoreError> {
        Ok(self.assignments.receiver_ids().await?)
    }

    async fn insert_assignment(
        &self,
        giver_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Assignment, StoreError> {
        match self.assignments.create(giver_id, receiver_id).await {
            Ok(entity) => Ok(entity.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                if db_err.constraint() == Some("assignments_giver_id_key") {
                    Err(StoreError::DuplicateGiver)
                } else {
                    Err(StoreError::DuplicateReceiver)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn record_email_sent(&self, assignment_id: Uuid) -> Result<(), StoreError> {
        Ok(self.assignments.mark_email_sent(assignment_id).await?)
    }
}

/// Orchestrates a single caller's draw.
pub struct DrawService {
    store: Arc<dyn DrawStore>,
    notifier: Arc<dyn AssignmentNotifier>,
}

impl DrawService {
    pub fn new(pool: PgPool, notifier: Arc<dyn AssignmentNotifier>) -> Self {
        Self::with_store(Arc::new(PgDrawStore::new(pool)), notifier)
    }

    pub fn with_store(store: Arc<dyn DrawStore>, notifier: Arc<dyn AssignmentNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Draws a name for the caller identified by a normalized email.
    pub async fn draw(&self, email: &str) -> Result<DrawResponse, DrawError> {
        let giver = self
            .store
            .find_active_participant(email)
            .await?
            .ok_or(DrawError::NotAuthorized)?;

        // Re-entry is idempotent: a giver who already drew gets the same
        // receiver back.
        if let Some(receiver) = self.store.receiver_name_for_giver(giver.id).await? {
            return Ok(DrawResponse {
                receiver,
                already_assigned: true,
            });
        }

        for attempt in 1..=MAX_DRAW_ATTEMPTS {
            let active = self.store.list_active_participants().await?;
            let taken: HashSet<Uuid> = self
                .store
                .taken_receiver_ids()
                .await?
                .into_iter()
                .collect();

            let (receiver_id, receiver_name) = {
                let pool = candidate_pool(&active, &taken, giver.id);
                if pool.is_empty() {
                    return Err(DrawError::NoCandidates);
                }
                let mut rng = rand::thread_rng();
                let receiver = pick_uniform(&mut rng, &pool).ok_or(DrawError::NoCandidates)?;
                (receiver.id, receiver.name.clone())
            };

            match self.store.insert_assignment(giver.id, receiver_id).await {
                Ok(assignment) => {
                    self.notify(&giver, assignment.id, &receiver_name).await;
                    return Ok(DrawResponse {
                        receiver: receiver_name,
                        already_assigned: false,
                    });
                }
                Err(StoreError::DuplicateGiver) => {
                    // A concurrent draw by the same giver won; return it.
                    let receiver = self
                        .store
                        .receiver_name_for_giver(giver.id)
                        .await?
                        .ok_or(DrawError::RaceConflict)?;
                    return Ok(DrawResponse {
                        receiver,
                        already_assigned: true,
                    });
                }
                Err(StoreError::DuplicateReceiver) => {
                    tracing::warn!(
                        giver = %giver.email,
                        attempt,
                        "Receiver taken by a concurrent draw, retrying"
                    );
                }
                Err(StoreError::Database(e)) => return Err(e.into()),
            }
        }

        Err(DrawError::RaceConflict)
    }

    /// Best-effort notification, bounded by [`NOTIFY_TIMEOUT`]. Flips
    /// `email_sent` on success; any failure is logged and swallowed.
    async fn notify(&self, giver: &Participant, assignment_id: Uuid, receiver_name: &str) {
        let note = AssignmentNotification {
            giver_name: giver.name.clone(),
            giver_email: giver.email.clone(),
            receiver_name: receiver_name.to_string(),
        };

        match tokio::time::timeout(NOTIFY_TIMEOUT, self.notifier.notify_assignment(&note)).await {
            Ok(Ok(())) => {
                if let Err(e) = self.store.record_email_sent(assignment_id).await {
                    tracing::warn!(
                        giver = %giver.email,
                        error = %e,
                        "Failed to record notification delivery"
                    );
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    giver = %giver.email,
                    error = %e,
                    "Assignment notification failed, assignment kept"
                );
            }
            Err(_) => {
                tracing::warn!(
                    giver = %giver.email,
                    "Assignment notification timed out, assignment kept"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::services::MockNotifier;
    use std::sync::Mutex;

    fn participant(name: &str) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct MemoryState {
        assignments: Vec<Assignment>,
        insert_calls: usize,
        /// Fail this many inserts with `DuplicateReceiver` first.
        duplicate_receiver_inserts: usize,
        /// Fail the next insert with `DuplicateGiver`, recording a rival
        /// assignment the way a concurrent winner would have.
        duplicate_giver_once: bool,
    }

    struct MemoryStore {
        roster: Vec<Participant>,
        state: Mutex<MemoryState>,
    }

    impl MemoryStore {
        fn new(roster: Vec<Participant>) -> Self {
            Self {
                roster,
                state: Mutex::new(MemoryState::default()),
            }
        }

        fn assignments(&self) -> Vec<Assignment> {
            self.state.lock().unwrap().assignments.clone()
        }

        fn insert_calls(&self) -> usize {
            self.state.lock().unwrap().insert_calls
        }

        fn name_of(&self, id: Uuid) -> String {
            self.roster
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl DrawStore for MemoryStore {
        async fn find_active_participant(
            &self,
            email: &str,
        ) -> Result<Option<Participant>, StoreError> {
            Ok(self.roster.iter().find(|p| p.email == email).cloned())
        }

        async fn list_active_participants(&self) -> Result<Vec<Participant>, StoreError> {
            Ok(self.roster.clone())
        }

        async fn receiver_name_for_giver(
            &self,
            giver_id: Uuid,
        ) -> Result<Option<String>, StoreError> {
            let state = self.state.lock().unwrap();
            Ok(state
                .assignments
                .iter()
                .find(|a| a.giver_id == giver_id)
                .map(|a| self.name_of(a.receiver_id)))
        }

        async fn taken_receiver_ids(&self) -> Result<Vec<Uuid>, StoreError> {
            let state = self.state.lock().unwrap();
            Ok(state.assignments.iter().map(|a| a.receiver_id).collect())
        }

        async fn insert_assignment(
            &self,
            giver_id: Uuid,
            receiver_id: Uuid,
        ) -> Result<Assignment, StoreError> {
            let mut state = self.state.lock().unwrap();
            state.insert_calls += 1;

            if state.duplicate_receiver_inserts > 0 {
                state.duplicate_receiver_inserts -= 1;
                return Err(StoreError::DuplicateReceiver);
            }
            if state.duplicate_giver_once {
                state.duplicate_giver_once = false;
                let rival_receiver = self
                    .roster
                    .iter()
                    .find(|p| p.id != giver_id)
                    .expect("roster needs a rival")
                    .id;
                state.assignments.push(Assignment {
                    id: Uuid::new_v4(),
                    giver_id,
                    receiver_id: rival_receiver,
                    email_sent: false,
                    assigned_at: Utc::now(),
                });
                return Err(StoreError::DuplicateGiver);
            }
            if state.assignments.iter().any(|a| a.giver_id == giver_id) {
                return Err(StoreError::DuplicateGiver);
            }
            if state.assignments.iter().any(|a| a.receiver_id == receiver_id) {
                return Err(StoreError::DuplicateReceiver);
            }

            let assignment = Assignment {
                id: Uuid::new_v4(),
                giver_id,
                receiver_id,
                email_sent: false,
                assigned_at: Utc::now(),
            };
            state.assignments.push(assignment.clone());
            Ok(assignment)
        }

        async fn record_email_sent(&self, assignment_id: Uuid) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            if let Some(a) = state.assignments.iter_mut().find(|a| a.id == assignment_id) {
                a.email_sent = true;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_draw_assigns_notifies_and_marks_email_sent() {
        let roster = vec![participant("Alice"), participant("Bob")];
        let store = Arc::new(MemoryStore::new(roster.clone()));
        let notifier = Arc::new(MockNotifier::new());
        let service = DrawService::with_store(store.clone(), notifier.clone());

        let response = service.draw("alice@x.com").await.unwrap();
        assert!(!response.already_assigned);
        assert_eq!(response.receiver, "Bob");

        let assignments = store.assignments();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].giver_id, roster[0].id);
        assert_eq!(assignments[0].receiver_id, roster[1].id);
        assert!(assignments[0].email_sent);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].giver_email, "alice@x.com");
        assert_eq!(sent[0].receiver_name, "Bob");
    }

    #[tokio::test]
    async fn test_reentry_returns_same_receiver_without_redrawing() {
        let roster = vec![
            participant("Alice"),
            participant("Bob"),
            participant("Carol"),
        ];
        let store = Arc::new(MemoryStore::new(roster));
        let notifier = Arc::new(MockNotifier::new());
        let service = DrawService::with_store(store.clone(), notifier.clone());

        let first = service.draw("alice@x.com").await.unwrap();
        let second = service.draw("alice@x.com").await.unwrap();

        assert!(!first.already_assigned);
        assert!(second.already_assigned);
        assert_eq!(second.receiver, first.receiver);
        assert_eq!(store.insert_calls(), 1);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_caller_is_rejected() {
        let store = Arc::new(MemoryStore::new(vec![participant("Alice")]));
        let service = DrawService::with_store(store, Arc::new(MockNotifier::new()));

        let result = service.draw("stranger@x.com").await;
        assert!(matches!(result, Err(DrawError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_single_participant_has_no_candidates() {
        let store = Arc::new(MemoryStore::new(vec![participant("Alice")]));
        let service = DrawService::with_store(store, Arc::new(MockNotifier::new()));

        let result = service.draw("alice@x.com").await;
        assert!(matches!(result, Err(DrawError::NoCandidates)));
    }

    #[tokio::test]
    async fn test_receiver_collision_is_retried() {
        let roster = vec![
            participant("Alice"),
            participant("Bob"),
            participant("Carol"),
        ];
        let store = Arc::new(MemoryStore::new(roster));
        store.state.lock().unwrap().duplicate_receiver_inserts = 1;
        let service = DrawService::with_store(store.clone(), Arc::new(MockNotifier::new()));

        let response = service.draw("alice@x.com").await.unwrap();
        assert!(!response.already_assigned);
        assert_eq!(store.insert_calls(), 2);
        assert_eq!(store.assignments().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_is_a_conflict() {
        let roster = vec![
            participant("Alice"),
            participant("Bob"),
            participant("Carol"),
        ];
        let store = Arc::new(MemoryStore::new(roster));
        store.state.lock().unwrap().duplicate_receiver_inserts = MAX_DRAW_ATTEMPTS as usize;
        let notifier = Arc::new(MockNotifier::new());
        let service = DrawService::with_store(store.clone(), notifier.clone());

        let result = service.draw("alice@x.com").await;
        assert!(matches!(result, Err(DrawError::RaceConflict)));
        assert_eq!(store.insert_calls(), MAX_DRAW_ATTEMPTS as usize);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_giver_race_returns_concurrent_winner() {
        let roster = vec![
            participant("Alice"),
            participant("Bob"),
            participant("Carol"),
        ];
        let store = Arc::new(MemoryStore::new(roster.clone()));
        store.state.lock().unwrap().duplicate_giver_once = true;
        let notifier = Arc::new(MockNotifier::new());
        let service = DrawService::with_store(store.clone(), notifier.clone());

        let response = service.draw("alice@x.com").await.unwrap();
        assert!(response.already_assigned);
        // The rival assignment was written for the first non-giver.
        assert_eq!(response.receiver, roster[1].name);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_assignment() {
        let roster = vec![participant("Alice"), participant("Bob")];
        let store = Arc::new(MemoryStore::new(roster));
        let notifier = Arc::new(MockNotifier::failing());
        let service = DrawService::with_store(store.clone(), notifier);

        let response = service.draw("alice@x.com").await.unwrap();
        assert!(!response.already_assigned);

        let assignments = store.assignments();
        assert_eq!(assignments.len(), 1);
        assert!(!assignments[0].email_sent);
    }
}
