//! SeaORM entities - the storage shapes of the domain model.

pub mod answer;
pub mod course;
pub mod enrollment;
pub mod enums;
pub mod question;
pub mod question_upvote;
pub mod session;
pub mod slide;
pub mod user;
