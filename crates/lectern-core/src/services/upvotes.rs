//! Upvote coordinator - keeps the cached `upvote_count` and the upvote
//! rows consistent under concurrent toggles.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::UpvoteToggle;
use crate::error::{DomainError, RepoError};
use crate::ports::QuestionRepository;

use super::gate::{WriteIntent, ensure_session_writable};
use super::CorePolicy;

#[derive(Clone)]
pub struct UpvoteService {
    questions: Arc<dyn QuestionRepository>,
    policy: CorePolicy,
}

impl UpvoteService {
    pub fn new(questions: Arc<dyn QuestionRepository>, policy: CorePolicy) -> Self {
        Self { questions, policy }
    }

    /// Toggle the caller's upvote on a question.
    ///
    /// The storage unique constraint on (question, user) is the arbiter
    /// for races: an insert that loses surfaces as a constraint violation,
    /// and the retry then observes the winner's row and takes the removal
    /// path instead of failing.
    pub async fn toggle(
        &self,
        question_id: Uuid,
        user_id: Uuid,
    ) -> Result<UpvoteToggle, DomainError> {
        let view = self
            .questions
            .find_with_session(question_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        ensure_session_writable(view.session_status, WriteIntent::ToggleUpvote, &self.policy)?;

        match self.questions.toggle_upvote(question_id, user_id).await {
            Ok(toggle) => Ok(toggle),
            Err(RepoError::Constraint(msg)) => {
                tracing::debug!(
                    question_id = %question_id,
                    user_id = %user_id,
                    constraint = %msg,
                    "upvote insert lost a race, retrying as removal"
                );
                Ok(self.questions.toggle_upvote(question_id, user_id).await?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::super::testing::{FakeStore, active_session};
    use super::*;
    use crate::domain::{Question, SessionStatus, UpvoteChange, Visibility};

    fn harness() -> (Arc<FakeStore>, UpvoteService, Uuid) {
        let store = Arc::new(FakeStore::new());
        let session = store.seed_session(active_session());
        let question = store.seed_question(Question::new(
            session.id,
            None,
            Uuid::new_v4(),
            "Can you repeat the proof?".into(),
            false,
            Visibility::Public,
        ));
        let service = UpvoteService::new(store.clone(), CorePolicy::default());
        (store, service, question.id)
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let (store, service, question_id) = harness();
        let voter = Uuid::new_v4();

        let added = service.toggle(question_id, voter).await.unwrap();
        assert_eq!(added.applied, UpvoteChange::Added);
        assert_eq!(added.new_count, 1);
        assert_eq!(store.upvote_rows(question_id), 1);

        let removed = service.toggle(question_id, voter).await.unwrap();
        assert_eq!(removed.applied, UpvoteChange::Removed);
        assert_eq!(removed.new_count, 0);
        assert_eq!(store.upvote_rows(question_id), 0);
    }

    #[tokio::test]
    async fn counter_always_matches_row_count() {
        let (store, service, question_id) = harness();
        let voters: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        for voter in &voters {
            service.toggle(question_id, *voter).await.unwrap();
        }
        assert_eq!(store.stored_question(question_id).upvote_count, 5);
        assert_eq!(store.upvote_rows(question_id), 5);

        for voter in voters.iter().take(2) {
            service.toggle(question_id, *voter).await.unwrap();
        }
        assert_eq!(store.stored_question(question_id).upvote_count, 3);
        assert_eq!(store.upvote_rows(question_id), 3);
    }

    #[tokio::test]
    async fn at_most_one_row_per_user() {
        let (store, service, question_id) = harness();
        let voter = Uuid::new_v4();

        for _ in 0..3 {
            service.toggle(question_id, voter).await.unwrap();
        }
        // odd number of toggles: exactly one row
        assert_eq!(store.upvote_rows(question_id), 1);
        assert_eq!(store.stored_question(question_id).upvote_count, 1);
    }

    #[tokio::test]
    async fn lost_insert_race_retries_as_removal() {
        let (store, service, question_id) = harness();
        let voter = Uuid::new_v4();
        store.inject_upvote_conflict.store(true, Ordering::SeqCst);

        let toggle = service.toggle(question_id, voter).await.unwrap();
        assert_eq!(toggle.applied, UpvoteChange::Removed);
        assert_eq!(store.upvote_rows(question_id), 0);
        assert_eq!(store.stored_question(question_id).upvote_count, 0);
    }

    #[tokio::test]
    async fn ended_session_rejects_upvotes() {
        let (store, service, question_id) = harness();
        {
            let mut sessions = store.sessions.lock().unwrap();
            sessions.values_mut().next().unwrap().status = SessionStatus::Ended;
        }
        let err = service.toggle(question_id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot upvote questions in an ended session");
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let (_store, service, _question_id) = harness();
        let err = service.toggle(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
