use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// Course entity - owned by the professor who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub semester: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(code: String, name: String, semester: String, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            name,
            semester,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// Enrollment join entity - (user, course) with a per-course role override.
/// Unique on (user_id, course_id) at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl CourseEnrollment {
    pub fn new(user_id: Uuid, course_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            role,
            created_at: Utc::now(),
        }
    }
}
