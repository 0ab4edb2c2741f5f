//! Read-side payloads returned by queries. Password digests never leave the domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courselib_auth::{RoleSet, User};
use courselib_core::{Course, CourseId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDto {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            author: course.author.clone(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}
