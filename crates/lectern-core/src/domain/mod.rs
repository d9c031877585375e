//! Domain entities - the core business objects.

mod answer;
mod course;
mod question;
mod session;
mod upvote;
mod user;

pub use answer::Answer;
pub use course::{Course, CourseEnrollment};
pub use question::{Question, QuestionStatus, Visibility};
pub use session::{Session, SessionStatus, Slide};
pub use upvote::{QuestionUpvote, UpvoteChange, UpvoteToggle};
pub use user::{Role, User};
