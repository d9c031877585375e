//! Slide entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "slides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_number: i32,
    #[sea_orm(column_type = "Text")]
    pub content_ref: String,
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
    #[sea_orm(has_many = "super::question::Entity")]
    Questions,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::Slide {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            slide_number: model.slide_number,
            content_ref: model.content_ref,
            created_at: model.created_at.into(),
        }
    }
}

impl From<lectern_core::domain::Slide> for ActiveModel {
    fn from(slide: lectern_core::domain::Slide) -> Self {
        Self {
            id: Set(slide.id),
            session_id: Set(slide.session_id),
            slide_number: Set(slide.slide_number),
            content_ref: Set(slide.content_ref),
            created_at: Set(slide.created_at.into()),
        }
    }
}
