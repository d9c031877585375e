//! PostgreSQL repository implementations.
//!
//! The two write paths with invariants - the upvote toggle and the answer
//! insert with its status flip - run inside explicit transactions; a
//! dropped transaction rolls back, so partial application never lands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use lectern_core::domain::{
    Answer, Question, QuestionStatus, QuestionUpvote, Role, Session, SessionStatus, Slide,
    UpvoteChange, UpvoteToggle,
};
use lectern_core::error::RepoError;
use lectern_core::ports::{
    AnswerRepository, EnrollmentRepository, QuestionRepository, QuestionWithSession,
    SessionRepository,
};

use super::entity::{answer, enrollment, enums, question, question_upvote, session, slide};

fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::RecordNotUpdated => RepoError::NotFound,
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// PostgreSQL session repository.
pub struct PostgresSessionRepository {
    db: DbConn,
}

impl PostgresSessionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError> {
        let result = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_join_code(&self, code: &str) -> Result<Option<Session>, RepoError> {
        let result = session::Entity::find()
            .filter(session::Column::JoinCode.eq(code))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_session: Session) -> Result<Session, RepoError> {
        let model: session::ActiveModel = new_session.into();
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(inserted.into())
    }

    async fn update_status(&self, id: Uuid, status: SessionStatus) -> Result<Session, RepoError> {
        let model = session::ActiveModel {
            id: Set(id),
            status: Set(status.into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let updated = model.update(&self.db).await.map_err(map_db_err)?;
        Ok(updated.into())
    }

    async fn update_submissions_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Session, RepoError> {
        let model = session::ActiveModel {
            id: Set(id),
            is_submissions_enabled: Set(enabled),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let updated = model.update(&self.db).await.map_err(map_db_err)?;
        Ok(updated.into())
    }

    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Session>, RepoError> {
        let result = session::Entity::find()
            .filter(session::Column::CourseId.eq(course_id))
            .order_by_desc(session::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn end_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let now_tz: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        let result = session::Entity::update_many()
            .col_expr(
                session::Column::Status,
                Expr::value(enums::SessionStatus::Ended),
            )
            .col_expr(session::Column::UpdatedAt, Expr::value(now_tz))
            .filter(session::Column::Status.ne(enums::SessionStatus::Ended))
            .filter(session::Column::EndTime.is_not_null())
            .filter(session::Column::EndTime.lt(now_tz))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    async fn insert_slide(&self, new_slide: Slide) -> Result<Slide, RepoError> {
        let model: slide::ActiveModel = new_slide.into();
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(inserted.into())
    }

    async fn find_slide(&self, id: Uuid) -> Result<Option<Slide>, RepoError> {
        let result = slide::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn list_slides(&self, session_id: Uuid) -> Result<Vec<Slide>, RepoError> {
        let result = slide::Entity::find()
            .filter(slide::Column::SessionId.eq(session_id))
            .order_by_asc(slide::Column::SlideNumber)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL question repository.
pub struct PostgresQuestionRepository {
    db: DbConn,
}

impl PostgresQuestionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn insert(&self, new_question: Question) -> Result<Question, RepoError> {
        let model: question::ActiveModel = new_question.into();
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(inserted.into())
    }

    async fn find_with_session(
        &self,
        id: Uuid,
    ) -> Result<Option<QuestionWithSession>, RepoError> {
        let result = question::Entity::find_by_id(id)
            .find_also_related(session::Entity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            None => Ok(None),
            Some((question_model, Some(session_model))) => Ok(Some(QuestionWithSession {
                question: question_model.into(),
                session_status: session_model.status.into(),
                course_id: session_model.course_id,
            })),
            Some((_, None)) => Err(RepoError::Query(
                "question row without a parent session".into(),
            )),
        }
    }

    async fn list_for_session(
        &self,
        session_id: Uuid,
        include_instructor_only: bool,
    ) -> Result<Vec<Question>, RepoError> {
        let mut query = question::Entity::find()
            .filter(question::Column::SessionId.eq(session_id));
        if !include_instructor_only {
            query = query.filter(question::Column::Visibility.eq(enums::Visibility::Public));
        }
        let result = query
            .order_by_desc(question::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn advance_status(
        &self,
        id: Uuid,
        from: QuestionStatus,
        to: QuestionStatus,
    ) -> Result<Question, RepoError> {
        question::Entity::update_many()
            .col_expr(
                question::Column::Status,
                Expr::value(enums::QuestionStatus::from(to)),
            )
            .filter(question::Column::Id.eq(id))
            .filter(question::Column::Status.eq(enums::QuestionStatus::from(from)))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let model = question::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;
        Ok(model.into())
    }

    async fn toggle_upvote(
        &self,
        question_id: Uuid,
        user_id: Uuid,
    ) -> Result<UpvoteToggle, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let existing = question_upvote::Entity::find()
            .filter(question_upvote::Column::QuestionId.eq(question_id))
            .filter(question_upvote::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        let applied = match existing {
            Some(row) => {
                question_upvote::Entity::delete_by_id(row.id)
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                question::Entity::update_many()
                    .col_expr(
                        question::Column::UpvoteCount,
                        Expr::col(question::Column::UpvoteCount).sub(1),
                    )
                    .filter(question::Column::Id.eq(question_id))
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                UpvoteChange::Removed
            }
            None => {
                let model: question_upvote::ActiveModel =
                    QuestionUpvote::new(question_id, user_id).into();
                // a concurrent insert surfaces here as Constraint; the
                // dropped transaction rolls back and the caller retries
                model.insert(&txn).await.map_err(map_db_err)?;
                question::Entity::update_many()
                    .col_expr(
                        question::Column::UpvoteCount,
                        Expr::col(question::Column::UpvoteCount).add(1),
                    )
                    .filter(question::Column::Id.eq(question_id))
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                UpvoteChange::Added
            }
        };

        let question_model = question::Entity::find_by_id(question_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(UpvoteToggle {
            applied,
            new_count: question_model.upvote_count,
        })
    }
}

/// PostgreSQL answer repository.
pub struct PostgresAnswerRepository {
    db: DbConn,
}

impl PostgresAnswerRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnswerRepository for PostgresAnswerRepository {
    async fn insert_marking_answered(&self, new_answer: Answer) -> Result<Answer, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model: answer::ActiveModel = new_answer.into();
        let inserted = model.insert(&txn).await.map_err(map_db_err)?;

        // first answer flips OPEN -> ANSWERED; the status filter makes the
        // flip idempotent under concurrent submissions
        question::Entity::update_many()
            .col_expr(
                question::Column::Status,
                Expr::value(enums::QuestionStatus::Answered),
            )
            .filter(question::Column::Id.eq(inserted.question_id))
            .filter(question::Column::Status.eq(enums::QuestionStatus::Open))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>, RepoError> {
        let result = answer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError> {
        let result = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_asc(answer::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn mark_accepted(&self, answer_id: Uuid) -> Result<Answer, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let target = answer::Entity::find_by_id(answer_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        // unaccept siblings first so at most one accepted answer survives
        answer::Entity::update_many()
            .col_expr(answer::Column::IsAccepted, Expr::value(false))
            .filter(answer::Column::QuestionId.eq(target.question_id))
            .filter(answer::Column::Id.ne(answer_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let updated = answer::ActiveModel {
            id: Set(answer_id),
            is_accepted: Set(true),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(updated.into())
    }
}

/// PostgreSQL enrollment repository.
pub struct PostgresEnrollmentRepository {
    db: DbConn,
}

impl PostgresEnrollmentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn role_in_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Role>, RepoError> {
        let result = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(|model| model.role.into()))
    }
}
