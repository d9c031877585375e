#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use lectern_core::domain::{Role, SessionStatus};
    use lectern_core::ports::{EnrollmentRepository, QuestionRepository, SessionRepository};

    use crate::database::entity::{enrollment, enums, question, session};
    use crate::database::postgres_repo::{
        PostgresEnrollmentRepository, PostgresQuestionRepository, PostgresSessionRepository,
    };

    fn session_model(id: Uuid, course_id: Uuid) -> session::Model {
        let now = chrono::Utc::now();
        session::Model {
            id,
            course_id,
            created_by: Uuid::new_v4(),
            title: "Week 2 lecture".to_owned(),
            join_code: "4B9E1C".to_owned(),
            status: enums::SessionStatus::Active,
            is_submissions_enabled: true,
            start_time: Some(now.into()),
            end_time: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_session_by_id_converts_status() {
        let session_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![session_model(session_id, course_id)]])
            .into_connection();

        let repo = PostgresSessionRepository::new(db);
        let result = repo.find_by_id(session_id).await.unwrap();

        let session = result.unwrap();
        assert_eq!(session.id, session_id);
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.is_submissions_enabled);
    }

    #[tokio::test]
    async fn test_find_question_with_session_joins_parent() {
        let question_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let question_model = question::Model {
            id: question_id,
            session_id,
            slide_id: None,
            author_id: None,
            content: "Is the quiz cumulative?".to_owned(),
            is_anonymous: true,
            visibility: enums::Visibility::Public,
            status: enums::QuestionStatus::Open,
            upvote_count: 3,
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![(
                question_model,
                session_model(session_id, course_id),
            )]])
            .into_connection();

        let repo = PostgresQuestionRepository::new(db);
        let view = repo.find_with_session(question_id).await.unwrap().unwrap();

        assert_eq!(view.question.id, question_id);
        assert!(view.question.author_id.is_none());
        assert_eq!(view.session_status, SessionStatus::Active);
        assert_eq!(view.course_id, course_id);
    }

    #[tokio::test]
    async fn test_role_in_course_maps_override() {
        let user_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![enrollment::Model {
                id: Uuid::new_v4(),
                user_id,
                course_id,
                role: enums::Role::Ta,
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresEnrollmentRepository::new(db);
        let role = repo.role_in_course(user_id, course_id).await.unwrap();
        assert_eq!(role, Some(Role::Ta));
    }
}
