//! Question entity for SeaORM.
//!
//! `author_id` is genuinely nullable: anonymous questions are stored with
//! no author reference at all, which makes anonymity irreversible here
//! rather than a display-layer mask.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::enums::{QuestionStatus, Visibility};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_anonymous: bool,
    pub visibility: Visibility,
    pub status: QuestionStatus,
    /// Cached aggregate of the upvote rows; written only inside the
    /// toggle transaction.
    pub upvote_count: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::slide::Entity",
        from = "Column::SlideId",
        to = "super::slide::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Slide,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(has_many = "super::answer::Entity")]
    Answers,
    #[sea_orm(has_many = "super::question_upvote::Entity")]
    Upvotes,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::slide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slide.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl Related<super::question_upvote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upvotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::Question {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            slide_id: model.slide_id,
            author_id: model.author_id,
            content: model.content,
            is_anonymous: model.is_anonymous,
            visibility: model.visibility.into(),
            status: model.status.into(),
            upvote_count: model.upvote_count,
            created_at: model.created_at.into(),
        }
    }
}

impl From<lectern_core::domain::Question> for ActiveModel {
    fn from(question: lectern_core::domain::Question) -> Self {
        Self {
            id: Set(question.id),
            session_id: Set(question.session_id),
            slide_id: Set(question.slide_id),
            author_id: Set(question.author_id),
            content: Set(question.content),
            is_anonymous: Set(question.is_anonymous),
            visibility: Set(question.visibility.into()),
            status: Set(question.status.into()),
            upvote_count: Set(question.upvote_count),
            created_at: Set(question.created_at.into()),
        }
    }
}
