use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds, either globally or within a single course.
///
/// A user's role within a course may differ from their global role
/// (a professor enrolled in a colleague's course as a TA, say), which is
/// why enrollment rows carry their own `Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Ta,
    Professor,
}

impl Role {
    /// Staff roles may answer on record, resolve questions, and manage
    /// sessions.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Ta | Role::Professor)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "TA" => Ok(Role::Ta),
            "PROFESSOR" => Ok(Role::Professor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity - identity plus a global role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// External institutional identifier (utorid-style), unique.
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(external_id: String, email: String, display_name: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id,
            email,
            display_name,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}
