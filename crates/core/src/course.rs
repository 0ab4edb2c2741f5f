//! Course record (the library's catalogue entry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainResult, ValidationErrors};
use crate::id::CourseId;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_AUTHOR_LEN: usize = 200;

/// Editable course fields, validated as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub title: String,
    pub description: String,
    pub author: String,
}

impl CourseDetails {
    /// Trim and validate every field, reporting all violations at once.
    pub fn validated(self) -> DomainResult<Self> {
        let details = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            author: self.author.trim().to_string(),
        };

        let mut errors = ValidationErrors::new();
        if details.title.is_empty() {
            errors.add("title", "must not be empty");
        } else if details.title.chars().count() > MAX_TITLE_LEN {
            errors.add("title", format!("must be at most {MAX_TITLE_LEN} characters"));
        }
        if details.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.add(
                "description",
                format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
            );
        }
        if details.author.is_empty() {
            errors.add("author", "must not be empty");
        } else if details.author.chars().count() > MAX_AUTHOR_LEN {
            errors.add("author", format!("must be at most {MAX_AUTHOR_LEN} characters"));
        }
        errors.into_result()?;

        Ok(details)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn create(id: CourseId, details: CourseDetails, now: DateTime<Utc>) -> DomainResult<Self> {
        let details = details.validated()?;
        Ok(Self {
            id,
            title: details.title,
            description: details.description,
            author: details.author,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields. On validation failure the course is unchanged.
    pub fn revise(&mut self, details: CourseDetails, now: DateTime<Utc>) -> DomainResult<()> {
        let details = details.validated()?;
        self.title = details.title;
        self.description = details.description;
        self.author = details.author;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
