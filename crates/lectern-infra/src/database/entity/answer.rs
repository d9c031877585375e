//! Answer entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_accepted: bool,
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
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Author,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::Answer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            question_id: model.question_id,
            author_id: model.author_id,
            content: model.content,
            is_accepted: model.is_accepted,
            created_at: model.created_at.into(),
        }
    }
}

impl From<lectern_core::domain::Answer> for ActiveModel {
    fn from(answer: lectern_core::domain::Answer) -> Self {
        Self {
            id: Set(answer.id),
            question_id: Set(answer.question_id),
            author_id: Set(answer.author_id),
            content: Set(answer.content),
            is_accepted: Set(answer.is_accepted),
            created_at: Set(answer.created_at.into()),
        }
    }
}
