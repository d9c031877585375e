//! ActiveEnum mirrors of the domain enums, stored as their wire names.

use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "TA")]
    Ta,
    #[sea_orm(string_value = "PROFESSOR")]
    Professor,
}

impl From<lectern_core::domain::Role> for Role {
    fn from(role: lectern_core::domain::Role) -> Self {
        match role {
            lectern_core::domain::Role::Student => Role::Student,
            lectern_core::domain::Role::Ta => Role::Ta,
            lectern_core::domain::Role::Professor => Role::Professor,
        }
    }
}

impl From<Role> for lectern_core::domain::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => lectern_core::domain::Role::Student,
            Role::Ta => lectern_core::domain::Role::Ta,
            Role::Professor => lectern_core::domain::Role::Professor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SessionStatus {
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "ENDED")]
    Ended,
}

impl From<lectern_core::domain::SessionStatus> for SessionStatus {
    fn from(status: lectern_core::domain::SessionStatus) -> Self {
        match status {
            lectern_core::domain::SessionStatus::Scheduled => SessionStatus::Scheduled,
            lectern_core::domain::SessionStatus::Active => SessionStatus::Active,
            lectern_core::domain::SessionStatus::Ended => SessionStatus::Ended,
        }
    }
}

impl From<SessionStatus> for lectern_core::domain::SessionStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Scheduled => lectern_core::domain::SessionStatus::Scheduled,
            SessionStatus::Active => lectern_core::domain::SessionStatus::Active,
            SessionStatus::Ended => lectern_core::domain::SessionStatus::Ended,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum QuestionStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "ANSWERED")]
    Answered,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
}

impl From<lectern_core::domain::QuestionStatus> for QuestionStatus {
    fn from(status: lectern_core::domain::QuestionStatus) -> Self {
        match status {
            lectern_core::domain::QuestionStatus::Open => QuestionStatus::Open,
            lectern_core::domain::QuestionStatus::Answered => QuestionStatus::Answered,
            lectern_core::domain::QuestionStatus::Resolved => QuestionStatus::Resolved,
        }
    }
}

impl From<QuestionStatus> for lectern_core::domain::QuestionStatus {
    fn from(status: QuestionStatus) -> Self {
        match status {
            QuestionStatus::Open => lectern_core::domain::QuestionStatus::Open,
            QuestionStatus::Answered => lectern_core::domain::QuestionStatus::Answered,
            QuestionStatus::Resolved => lectern_core::domain::QuestionStatus::Resolved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Visibility {
    #[sea_orm(string_value = "PUBLIC")]
    Public,
    #[sea_orm(string_value = "INSTRUCTOR_ONLY")]
    InstructorOnly,
}

impl From<lectern_core::domain::Visibility> for Visibility {
    fn from(visibility: lectern_core::domain::Visibility) -> Self {
        match visibility {
            lectern_core::domain::Visibility::Public => Visibility::Public,
            lectern_core::domain::Visibility::InstructorOnly => Visibility::InstructorOnly,
        }
    }
}

impl From<Visibility> for lectern_core::domain::Visibility {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => lectern_core::domain::Visibility::Public,
            Visibility::InstructorOnly => lectern_core::domain::Visibility::InstructorOnly,
        }
    }
}
