//! Course enrollment join entity. Unique on (user_id, course_id) via the
//! migration-defined index.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::enums::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "course_enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    /// Per-course role override; takes precedence over the user's global
    /// role wherever both exist.
    pub role: Role,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lectern_core::domain::CourseEnrollment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            course_id: model.course_id,
            role: model.role.into(),
            created_at: model.created_at.into(),
        }
    }
}

impl From<lectern_core::domain::CourseEnrollment> for ActiveModel {
    fn from(enrollment: lectern_core::domain::CourseEnrollment) -> Self {
        Self {
            id: Set(enrollment.id),
            user_id: Set(enrollment.user_id),
            course_id: Set(enrollment.course_id),
            role: Set(enrollment.role.into()),
            created_at: Set(enrollment.created_at.into()),
        }
    }
}
