//! Question upvote join entity. The (question_id, user_id) unique index
//! defined in the migration is the arbiter for concurrent toggles.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "question_upvotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::QuestionUpvote {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            question_id: model.question_id,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<lectern_core::domain::QuestionUpvote> for ActiveModel {
    fn from(upvote: lectern_core::domain::QuestionUpvote) -> Self {
        Self {
            id: Set(upvote.id),
            question_id: Set(upvote.question_id),
            user_id: Set(upvote.user_id),
            created_at: Set(upvote.created_at.into()),
        }
    }
}
