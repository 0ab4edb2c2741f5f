use serde::{Deserialize, Serialize};

use courselib_application::commands::{CreateCourse, UpdateCourse};
use courselib_core::{CourseDetails, CourseId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl core::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: String,
}

impl CourseRequest {
    fn into_details(self) -> CourseDetails {
        CourseDetails {
            title: self.title,
            description: self.description,
            author: self.author,
        }
    }

    pub fn into_create(self) -> CreateCourse {
        CreateCourse {
            details: self.into_details(),
        }
    }

    pub fn into_update(self, id: CourseId) -> UpdateCourse {
        UpdateCourse {
            id,
            details: self.into_details(),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse<T> {
    pub id: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}
