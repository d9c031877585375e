//! Session entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::enums::SessionStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub join_code: String,
    pub status: SessionStatus,
    pub is_submissions_enabled: bool,
    pub start_time: Option<DateTimeWithTimeZone>,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Creator,
    #[sea_orm(has_many = "super::slide::Entity")]
    Slides,
    #[sea_orm(has_many = "super::question::Entity")]
    Questions,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::slide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slides.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::Session {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            created_by: model.created_by,
            title: model.title,
            join_code: model.join_code,
            status: model.status.into(),
            is_submissions_enabled: model.is_submissions_enabled,
            start_time: model.start_time.map(Into::into),
            end_time: model.end_time.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<lectern_core::domain::Session> for ActiveModel {
    fn from(session: lectern_core::domain::Session) -> Self {
        Self {
            id: Set(session.id),
            course_id: Set(session.course_id),
            created_by: Set(session.created_by),
            title: Set(session.title),
            join_code: Set(session.join_code),
            status: Set(session.status.into()),
            is_submissions_enabled: Set(session.is_submissions_enabled),
            start_time: Set(session.start_time.map(Into::into)),
            end_time: Set(session.end_time.map(Into::into)),
            created_at: Set(session.created_at.into()),
            updated_at: Set(session.updated_at.into()),
        }
    }
}
